// Automated Raffle Program - Errors
use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError};
use thiserror::Error;

use crate::state::RaffleState;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstruction,

    /// Raffle account was already initialized
    #[error("Raffle already initialized")]
    AlreadyInitialized,

    /// Raffle account has not been initialized
    #[error("Raffle not initialized")]
    NotInitialized,

    /// Raffle account is not the expected program address
    #[error("Invalid raffle account")]
    InvalidRaffleAccount,

    /// Contribution is below the entrance fee
    #[error("Send more to enter the raffle")]
    InsufficientStake,

    /// Raffle is calculating a winner and rejects entries
    #[error("Raffle is not open")]
    RoundLocked,

    /// Raffle holds the maximum number of entries
    #[error("Raffle is full")]
    RaffleFull,

    /// Pooled value would overflow
    #[error("Amount overflow")]
    AmountOverflow,

    /// Upkeep predicate did not hold when the action was attempted
    #[error(
        "Upkeep not needed: balance={pooled_value}, players={num_players}, elapsed={elapsed}, state={state:?}"
    )]
    UpkeepNotNeeded {
        pooled_value: u64,
        num_players: u64,
        elapsed: UnixTimestamp,
        state: RaffleState,
    },

    /// Randomness provider program does not match the configured one
    #[error("Invalid randomness provider")]
    InvalidRandomnessProvider,

    /// Fulfillment was not signed by the configured provider authority
    #[error("Invalid randomness authority")]
    InvalidRandomnessAuthority,

    /// Randomness provider did not hand back a request id
    #[error("Randomness request failed")]
    RandomnessRequestFailed,

    /// Fulfillment does not match the outstanding request
    #[error("Nonexistent request")]
    UnknownRequest,

    /// Fulfillment carried no random words
    #[error("No random words supplied")]
    NoRandomWords,

    /// Prize transfer to the winner failed
    #[error("Transfer failed")]
    TransferFailed,

    /// Player index is past the end of the player list
    #[error("Player index out of bounds")]
    PlayerIndexOutOfBounds,

    /// Initializer is not the program's upgrade authority
    #[error("Only the upgrade authority may initialize the raffle")]
    UnauthorizedInitializer,

    /// Program data account is not the raffle program's upgradeable loader state
    #[error("Invalid program data account")]
    InvalidProgramData,
}

impl RaffleError {
    /// Stable custom error code surfaced through `ProgramError::Custom`
    pub fn code(&self) -> u32 {
        match self {
            RaffleError::InvalidInstruction => 0,
            RaffleError::AlreadyInitialized => 1,
            RaffleError::NotInitialized => 2,
            RaffleError::InvalidRaffleAccount => 3,
            RaffleError::InsufficientStake => 4,
            RaffleError::RoundLocked => 5,
            RaffleError::RaffleFull => 6,
            RaffleError::AmountOverflow => 7,
            RaffleError::UpkeepNotNeeded { .. } => 8,
            RaffleError::InvalidRandomnessProvider => 9,
            RaffleError::InvalidRandomnessAuthority => 10,
            RaffleError::RandomnessRequestFailed => 11,
            RaffleError::UnknownRequest => 12,
            RaffleError::NoRandomWords => 13,
            RaffleError::TransferFailed => 14,
            RaffleError::PlayerIndexOutOfBounds => 15,
            RaffleError::UnauthorizedInitializer => 16,
            RaffleError::InvalidProgramData => 17,
        }
    }
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        msg!("Error: {}", e);
        ProgramError::Custom(e.code())
    }
}
