// Automated Raffle Program
// Players enter a round, a keeper locks it once the interval has passed, and
// the randomness provider's callback picks and pays the winner.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod instruction;
pub mod keeper;
pub mod ledger;
pub mod processor;
pub mod state;
pub mod utils;
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process_instruction(program_id, accounts, instruction_data)
}
