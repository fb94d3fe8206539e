// Automated Raffle Program - Round state machine
//
// Open --perform_upkeep--> Calculating --fulfill_random_words--> Open
//
// Every transition validates first and mutates last, so a rejected call
// leaves the raffle exactly as it found it.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::{
    error::RaffleError,
    events::RaffleEvent,
    ledger::Ledger,
    state::{Raffle, RaffleState, MAX_PLAYERS},
    utils,
    vrf::{RandomnessProvider, RandomnessRequest},
};

/// Outcome of evaluating the upkeep predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
    pub is_open: bool,
    pub elapsed: UnixTimestamp,
}

impl UpkeepCheck {
    pub fn upkeep_needed(&self) -> bool {
        self.time_passed && self.has_players && self.has_balance && self.is_open
    }
}

/// Answer to an automation trigger's check, as returned by `CheckUpkeep`
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub upkeep_needed: bool,
    pub perform_data: Vec<u8>,
}

impl Raffle {
    /// Record an entry of `amount` lamports for `player`
    pub fn enter(&mut self, player: Pubkey, amount: u64) -> Result<RaffleEvent, RaffleError> {
        if amount < self.config.entrance_fee {
            msg!(
                "Entry of {} lamports is below the entrance fee of {}",
                amount,
                self.config.entrance_fee
            );
            return Err(RaffleError::InsufficientStake);
        }
        if self.state != RaffleState::Open {
            return Err(RaffleError::RoundLocked);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RaffleError::RaffleFull);
        }
        let pooled_value = self
            .pooled_value
            .checked_add(amount)
            .ok_or(RaffleError::AmountOverflow)?;

        self.players.push(player);
        self.pooled_value = pooled_value;

        Ok(RaffleEvent::EntryRecorded {
            player,
            player_count: self.number_of_players(),
        })
    }

    /// Evaluate whether the round may be locked and settled. Never mutates.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> UpkeepCheck {
        let elapsed = now.saturating_sub(self.last_timestamp);
        UpkeepCheck {
            time_passed: elapsed >= 0 && elapsed as u64 >= self.config.interval,
            has_players: !self.players.is_empty(),
            has_balance: self.pooled_value > 0,
            is_open: self.state == RaffleState::Open,
            elapsed,
        }
    }

    /// `check_upkeep` in the shape automation triggers expect. No perform data
    /// is needed since `perform_upkeep` re-reads everything from the raffle.
    pub fn upkeep_status(&self, now: UnixTimestamp) -> UpkeepStatus {
        UpkeepStatus {
            upkeep_needed: self.check_upkeep(now).upkeep_needed(),
            perform_data: Vec::new(),
        }
    }

    /// Lock the round and ask the provider for randomness. The predicate is
    /// re-evaluated here; a prior `check_upkeep` is only a hint.
    pub fn perform_upkeep<P: RandomnessProvider>(
        &mut self,
        now: UnixTimestamp,
        provider: &mut P,
    ) -> Result<RaffleEvent, RaffleError> {
        let check = self.check_upkeep(now);
        if !check.upkeep_needed() {
            return Err(RaffleError::UpkeepNotNeeded {
                pooled_value: self.pooled_value,
                num_players: self.number_of_players(),
                elapsed: check.elapsed,
                state: self.state,
            });
        }

        let request_id = provider.request_random_words(&self.randomness_request())?;

        self.state = RaffleState::Calculating;
        self.outstanding_request_id = Some(request_id);

        Ok(RaffleEvent::RequestedRaffleWinner { request_id })
    }

    /// Settle the round with the provider's answer to the outstanding request.
    /// If the payout fails nothing changes and the round stays locked.
    pub fn fulfill_random_words<L: Ledger>(
        &mut self,
        request_id: u64,
        random_words: &[u64],
        now: UnixTimestamp,
        ledger: &mut L,
    ) -> Result<RaffleEvent, RaffleError> {
        if self.state != RaffleState::Calculating
            || self.outstanding_request_id != Some(request_id)
        {
            msg!(
                "Request {} does not match outstanding {:?}",
                request_id,
                self.outstanding_request_id
            );
            return Err(RaffleError::UnknownRequest);
        }
        let random_word = *random_words.first().ok_or(RaffleError::NoRandomWords)?;
        let winner_index = utils::winner_index(random_word, self.players.len())
            .ok_or(RaffleError::UnknownRequest)?;
        let winner = self.players[winner_index];
        let prize = self.pooled_value;

        ledger.transfer(&winner, prize)?;

        self.recent_winner = Some(winner);
        self.players.clear();
        self.pooled_value = 0;
        self.last_timestamp = now;
        self.outstanding_request_id = None;
        self.state = RaffleState::Open;
        self.round = self.round.saturating_add(1);

        Ok(RaffleEvent::WinnerPicked {
            winner,
            prize,
            round: self.round,
        })
    }

    /// Request parameters taken from the raffle's configuration
    pub fn randomness_request(&self) -> RandomnessRequest {
        RandomnessRequest {
            key_hash: self.config.key_hash,
            subscription_id: self.config.subscription_id,
            request_confirmations: self.config.request_confirmations,
            callback_compute_limit: self.config.callback_compute_limit,
            num_words: self.config.num_words,
        }
    }
}
