// Automated Raffle Program - Utility Functions
use arrayref::{array_ref, array_refs};
use solana_program::{
    bpf_loader_upgradeable::{self, UpgradeableLoaderState},
    pubkey::Pubkey,
};

use crate::{error::RaffleError, state::RAFFLE_SEED};

/// Loader state tag of a `ProgramData` account
const PROGRAM_DATA_TAG: u32 = 3;

/// Slot of the winning entry for a random word. `None` when there are no entries.
pub fn winner_index(random_word: u64, player_count: usize) -> Option<usize> {
    if player_count == 0 {
        return None;
    }
    Some((random_word % player_count as u64) as usize)
}

/// Find the program derived address of the raffle
pub fn find_raffle_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RAFFLE_SEED], program_id)
}

/// Find the upgradeable loader's program data address for a program
pub fn find_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}

/// Upgrade authority recorded in a program data account. `None` once the
/// program has been made immutable.
pub fn upgrade_authority(program_data: &[u8]) -> Result<Option<Pubkey>, RaffleError> {
    if program_data.len() < UpgradeableLoaderState::size_of_programdata_metadata() {
        return Err(RaffleError::InvalidProgramData);
    }
    let metadata = array_ref![program_data, 0, 45];
    let (tag, _slot, has_authority, authority) = array_refs![metadata, 4, 8, 1, 32];

    if u32::from_le_bytes(*tag) != PROGRAM_DATA_TAG {
        return Err(RaffleError::InvalidProgramData);
    }
    match has_authority[0] {
        0 => Ok(None),
        1 => Ok(Some(Pubkey::new_from_array(*authority))),
        _ => Err(RaffleError::InvalidProgramData),
    }
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}
