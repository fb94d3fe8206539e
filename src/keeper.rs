// Automation trigger for the raffle
//
// A keeper polls `check_upkeep` and calls `perform_upkeep` when it says so.
// The check is only a hint: the target re-validates inside `perform_upkeep`,
// so a keeper acting on a stale answer gets a rejection, never a double lock.
use solana_program::{clock::UnixTimestamp, msg};

use crate::{
    coordinator::UpkeepStatus,
    error::RaffleError,
    events::RaffleEvent,
    state::Raffle,
    vrf::RandomnessProvider,
};

/// Something an automation trigger can drive
pub trait AutomationCompatible {
    fn check_upkeep(&self, check_data: &[u8]) -> UpkeepStatus;

    fn perform_upkeep(&mut self, perform_data: &[u8]) -> Result<RaffleEvent, RaffleError>;
}

/// Result of a single keeper poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeeperOutcome {
    /// Upkeep was not needed
    Idle,
    /// Upkeep ran
    Performed(RaffleEvent),
    /// Upkeep looked needed but the target refused it
    Rejected(RaffleError),
}

/// Polling automation trigger
#[derive(Debug, Default)]
pub struct Keeper {
    check_data: Vec<u8>,
    polls: u64,
    performed: u64,
}

impl Keeper {
    pub fn new(check_data: Vec<u8>) -> Self {
        Self {
            check_data,
            ..Self::default()
        }
    }

    /// Check the target once and act on the answer
    pub fn poll<T: AutomationCompatible>(&mut self, target: &mut T) -> KeeperOutcome {
        self.polls += 1;

        let status = target.check_upkeep(&self.check_data);
        if !status.upkeep_needed {
            return KeeperOutcome::Idle;
        }

        match target.perform_upkeep(&status.perform_data) {
            Ok(event) => {
                self.performed += 1;
                KeeperOutcome::Performed(event)
            }
            Err(err) => {
                msg!("Keeper poll {} rejected: {}", self.polls, err);
                KeeperOutcome::Rejected(err)
            }
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn performed(&self) -> u64 {
        self.performed
    }
}

/// A raffle seen at a fixed point in time, wired to a randomness provider
pub struct RaffleUpkeep<'a, P> {
    pub raffle: &'a mut Raffle,
    pub provider: &'a mut P,
    pub now: UnixTimestamp,
}

impl<'a, P: RandomnessProvider> AutomationCompatible for RaffleUpkeep<'a, P> {
    fn check_upkeep(&self, _check_data: &[u8]) -> UpkeepStatus {
        self.raffle.upkeep_status(self.now)
    }

    fn perform_upkeep(&mut self, _perform_data: &[u8]) -> Result<RaffleEvent, RaffleError> {
        self.raffle.perform_upkeep(self.now, self.provider)
    }
}
