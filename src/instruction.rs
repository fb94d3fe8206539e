// Automated Raffle Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    error::RaffleError,
    state::RaffleConfig,
    utils::{find_program_data_address, find_raffle_address},
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleInstruction {
    /// Create the raffle account and open the first round (upgrade authority only)
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The program's upgrade authority, paying for the raffle account
    /// 1. `[writable]` The raffle account (PDA, seeds `[b"raffle"]`)
    /// 2. `[]` The system program
    /// 3. `[]` The program's data account under the upgradeable loader
    InitializeRaffle { config: RaffleConfig },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player, who pays `amount`
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    EnterRaffle {
        /// Lamports to contribute, at least the entrance fee
        amount: u64,
    },

    /// Evaluate the upkeep predicate. Sets a borsh `UpkeepStatus` as return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep { check_data: Vec<u8> },

    /// Lock the round and request randomness (anyone may call, typically a keeper)
    ///
    /// Accounts expected:
    /// 0. `[writable]` The raffle account
    /// 1. `[]` The randomness provider program
    /// 2. `[writable]` The randomness provider state account
    /// Remaining accounts are forwarded to the provider
    PerformUpkeep { perform_data: Vec<u8> },

    /// Settle the round with the provider's random words
    ///
    /// Accounts expected:
    /// 0. `[signer]` The randomness provider authority
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The winner's account
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<u64>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstruction.into())
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    payer: &Pubkey,
    config: RaffleConfig,
) -> Result<Instruction, ProgramError> {
    let (raffle, _) = find_raffle_address(program_id);
    let data = RaffleInstruction::InitializeRaffle { config }.pack()?;

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(find_program_data_address(program_id), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    player: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (raffle, _) = find_raffle_address(program_id);
    let data = RaffleInstruction::EnterRaffle { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    check_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let (raffle, _) = find_raffle_address(program_id);
    let data = RaffleInstruction::CheckUpkeep { check_data }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(raffle, false)],
        data,
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    vrf_program: &Pubkey,
    vrf_state: &Pubkey,
    perform_data: Vec<u8>,
    remaining_accounts: &[AccountMeta],
) -> Result<Instruction, ProgramError> {
    let (raffle, _) = find_raffle_address(program_id);
    let data = RaffleInstruction::PerformUpkeep { perform_data }.pack()?;

    let mut accounts = vec![
        AccountMeta::new(raffle, false),
        AccountMeta::new_readonly(*vrf_program, false),
        AccountMeta::new(*vrf_state, false),
    ];
    accounts.extend_from_slice(remaining_accounts);

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    vrf_authority: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<Instruction, ProgramError> {
    let (raffle, _) = find_raffle_address(program_id);
    let data = RaffleInstruction::FulfillRandomWords {
        request_id,
        random_words,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*vrf_authority, true),
        AccountMeta::new(raffle, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
