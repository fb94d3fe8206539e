// Randomness provider integration for the automated raffle
use arrayref::array_ref;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{get_return_data, invoke_signed},
    pubkey::Pubkey,
};

use crate::error::RaffleError;

/// Parameters of a single randomness request
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    /// Provider key hash (gas lane)
    pub key_hash: [u8; 32],
    /// Subscription paying for the request
    pub subscription_id: u64,
    /// Confirmations to wait before responding
    pub request_confirmations: u16,
    /// Compute budget granted to the fulfillment callback
    pub callback_compute_limit: u32,
    /// Number of random words to deliver
    pub num_words: u32,
}

/// Instructions the raffle sends to the randomness provider program
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum VrfInstruction {
    /// Request random words. The provider sets the request id as return data.
    ///
    /// Accounts expected:
    /// 0. `[signer]` The consumer (raffle account)
    /// 1. `[writable]` The provider state account
    /// Remaining accounts are forwarded untouched
    RequestRandomWords(RandomnessRequest),
}

/// Source of randomness for the raffle. `request_random_words` only issues the
/// request; the words arrive later through a separate fulfillment call.
pub trait RandomnessProvider {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, RaffleError>;
}

/// Create a request_random_words instruction for the provider program
pub fn request_random_words(
    vrf_program: &Pubkey,
    consumer: &Pubkey,
    provider_state: &Pubkey,
    request: RandomnessRequest,
    remaining_accounts: &[AccountMeta],
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*consumer, true),
        AccountMeta::new(*provider_state, false),
    ];
    accounts.extend_from_slice(remaining_accounts);

    Instruction::new_with_borsh(
        *vrf_program,
        &VrfInstruction::RequestRandomWords(request),
        accounts,
    )
}

/// Read the request id a provider program left in the return data
pub fn parse_request_id(
    return_data: Option<(Pubkey, Vec<u8>)>,
    vrf_program: &Pubkey,
) -> Result<u64, RaffleError> {
    let (program_id, data) = return_data.ok_or_else(|| {
        msg!("Randomness provider returned no request id");
        RaffleError::RandomnessRequestFailed
    })?;

    if program_id != *vrf_program {
        msg!("Return data came from {}, expected {}", program_id, vrf_program);
        return Err(RaffleError::InvalidRandomnessProvider);
    }
    if data.len() < 8 {
        msg!("Request id is {} bytes, expected 8", data.len());
        return Err(RaffleError::RandomnessRequestFailed);
    }

    Ok(u64::from_le_bytes(*array_ref![data, 0, 8]))
}

/// Issues requests by invoking the provider program, signing as the raffle
pub struct CpiRandomnessProvider<'a, 'b> {
    pub vrf_program: &'a AccountInfo<'b>,
    pub consumer: &'a AccountInfo<'b>,
    pub provider_state: &'a AccountInfo<'b>,
    pub remaining_accounts: &'a [AccountInfo<'b>],
    pub consumer_seeds: &'a [&'a [u8]],
}

impl<'a, 'b> RandomnessProvider for CpiRandomnessProvider<'a, 'b> {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, RaffleError> {
        let remaining_metas: Vec<AccountMeta> = self
            .remaining_accounts
            .iter()
            .map(|acc| AccountMeta {
                pubkey: *acc.key,
                is_signer: acc.is_signer,
                is_writable: acc.is_writable,
            })
            .collect();

        let instruction = request_random_words(
            self.vrf_program.key,
            self.consumer.key,
            self.provider_state.key,
            *request,
            &remaining_metas,
        );

        let mut account_infos = vec![
            self.consumer.clone(),
            self.provider_state.clone(),
            self.vrf_program.clone(),
        ];
        account_infos.extend_from_slice(self.remaining_accounts);

        invoke_signed(&instruction, &account_infos, &[self.consumer_seeds]).map_err(|e| {
            msg!("Randomness request CPI failed: {}", e);
            RaffleError::RandomnessRequestFailed
        })?;

        parse_request_id(get_return_data(), self.vrf_program.key)
    }
}
