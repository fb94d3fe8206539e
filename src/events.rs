// Automated Raffle Program - Events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

/// Prefix of every event payload written with `sol_log_data`, so indexers can
/// tell raffle events apart from other data logs
pub const EVENT_TAG: &[u8] = b"raffle:event";

/// Observable raffle events
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    /// A player joined the current round
    EntryRecorded { player: Pubkey, player_count: u64 },
    /// A randomness request was issued and the round locked
    RequestedRaffleWinner { request_id: u64 },
    /// The round settled and the prize was paid
    WinnerPicked { winner: Pubkey, prize: u64, round: u64 },
}

impl RaffleEvent {
    /// Write the event to the program log, readable and borsh-encoded
    pub fn emit(&self) {
        match self {
            RaffleEvent::EntryRecorded {
                player,
                player_count,
            } => msg!("RaffleEnter: player={} players={}", player, player_count),
            RaffleEvent::RequestedRaffleWinner { request_id } => {
                msg!("RequestedRaffleWinner: request_id={}", request_id)
            }
            RaffleEvent::WinnerPicked {
                winner,
                prize,
                round,
            } => msg!(
                "WinnerPicked: winner={} prize={} round={}",
                winner,
                prize,
                round
            ),
        }

        if let Ok(payload) = self.try_to_vec() {
            sol_log_data(&[EVENT_TAG, payload.as_slice()]);
        }
    }

    /// Decode the borsh payload of a data log written by `emit`
    pub fn decode(fields: &[&[u8]]) -> Option<Self> {
        match fields {
            [tag, payload] if *tag == EVENT_TAG => Self::try_from_slice(payload).ok(),
            _ => None,
        }
    }
}
