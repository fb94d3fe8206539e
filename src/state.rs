// Automated Raffle Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
    pubkey::{Pubkey, PUBKEY_BYTES},
};

use crate::error::RaffleError;

/// Seed of the raffle program address, which also holds the prize pool
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Upper bound on entries per round, fixed by the account size
pub const MAX_PLAYERS: usize = 256;

/// Random words requested per round when no other value is configured
pub const DEFAULT_NUM_WORDS: u32 = 1;

/// Confirmations the provider waits for when no other value is configured
pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;

/// Compute budget granted to the fulfillment callback when no other value is configured
pub const DEFAULT_CALLBACK_COMPUTE_LIMIT: u32 = 200_000;

/// Status of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries
    Open,
    /// Waiting for the randomness provider, entries rejected
    Calculating,
}

/// Immutable raffle settings, fixed at initialization
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Minimum contribution in lamports
    pub entrance_fee: u64,
    /// Seconds that must elapse after a round starts before upkeep may run
    pub interval: u64,
    /// Program that serves randomness requests
    pub vrf_program: Pubkey,
    /// Signer the provider uses when it calls back with random words
    pub vrf_authority: Pubkey,
    /// Provider key hash (gas lane)
    pub key_hash: [u8; 32],
    /// Provider subscription paying for requests
    pub subscription_id: u64,
    /// Confirmations the provider waits before responding
    pub request_confirmations: u16,
    /// Compute budget the provider grants the fulfillment callback
    pub callback_compute_limit: u32,
    /// Random words per request
    pub num_words: u32,
}

impl RaffleConfig {
    pub const LEN: usize = 8 + 8 + PUBKEY_BYTES + PUBKEY_BYTES + 32 + 8 + 2 + 4 + 4;

    /// Settings with the default request parameters and no key hash or subscription
    pub fn new(entrance_fee: u64, interval: u64, vrf_program: Pubkey, vrf_authority: Pubkey) -> Self {
        Self {
            entrance_fee,
            interval,
            vrf_program,
            vrf_authority,
            key_hash: [0u8; 32],
            subscription_id: 0,
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            callback_compute_limit: DEFAULT_CALLBACK_COMPUTE_LIMIT,
            num_words: DEFAULT_NUM_WORDS,
        }
    }

    /// Reject settings the state machine cannot work with
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.interval == 0 || self.num_words == 0 {
            return Err(ProgramError::InvalidArgument);
        }
        Ok(())
    }
}

/// Raffle account data. One per program, stored at the `RAFFLE_SEED` address.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Bump of the raffle program address
    pub bump: u8,
    /// Settings fixed at initialization
    pub config: RaffleConfig,
    /// Status of the current round
    pub state: RaffleState,
    /// Entries in arrival order; an index into this list selects the winner
    pub players: Vec<Pubkey>,
    /// Lamports collected this round
    pub pooled_value: u64,
    /// Start of the current round
    pub last_timestamp: UnixTimestamp,
    /// Request awaiting fulfillment, if any
    pub outstanding_request_id: Option<u64>,
    /// Winner of the last settled round
    pub recent_winner: Option<Pubkey>,
    /// Number of settled rounds
    pub round: u64,
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    pub const LEN: usize = 1 // is_initialized
        + 1 // bump
        + RaffleConfig::LEN
        + 1 // state
        + 4 + PUBKEY_BYTES * MAX_PLAYERS // players
        + 8 // pooled_value
        + 8 // last_timestamp
        + 1 + 8 // outstanding_request_id
        + 1 + PUBKEY_BYTES // recent_winner
        + 8; // round

    /// Create an open raffle whose first round starts at `now`
    pub fn new(config: RaffleConfig, bump: u8, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            bump,
            config,
            state: RaffleState::Open,
            players: Vec::new(),
            pooled_value: 0,
            last_timestamp: now,
            outstanding_request_id: None,
            recent_winner: None,
            round: 0,
        }
    }

    /// Decode from account data. Trailing bytes past the player list are ignored.
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let raffle = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }
        Ok(raffle)
    }

    /// Encode into account data
    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        let mut writer = dst;
        self.serialize(&mut writer)
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn raffle_state(&self) -> RaffleState {
        self.state
    }

    /// Player at `index`, in entry order
    pub fn player(&self, index: usize) -> Result<Pubkey, RaffleError> {
        self.players
            .get(index)
            .copied()
            .ok_or(RaffleError::PlayerIndexOutOfBounds)
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn last_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn number_of_players(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn pooled_value(&self) -> u64 {
        self.pooled_value
    }

    pub fn outstanding_request_id(&self) -> Option<u64> {
        self.outstanding_request_id
    }

    pub fn num_words(&self) -> u32 {
        self.config.num_words
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.request_confirmations
    }

    pub fn round(&self) -> u64 {
        self.round
    }
}
