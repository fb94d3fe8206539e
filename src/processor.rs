// Automated Raffle Program - Instruction Processor
use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    bpf_loader_upgradeable,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    error::RaffleError,
    instruction::RaffleInstruction,
    ledger::LamportLedger,
    state::{Raffle, RaffleConfig, RAFFLE_SEED},
    utils,
    vrf::CpiRandomnessProvider,
};

/// Program state handler.
pub struct Processor {}

impl Processor {
    /// Process a raffle instruction
    pub fn process_instruction(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle { config } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(program_id, accounts, config)
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(program_id, accounts, amount)
            }
            RaffleInstruction::CheckUpkeep { check_data } => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts, &check_data)
            }
            RaffleInstruction::PerformUpkeep { perform_data } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts, &perform_data)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, &random_words)
            }
        }
    }

    /// Process InitializeRaffle instruction
    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: RaffleConfig,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;
        let program_data_info = next_account_info(account_info_iter)?;

        // Verify the payer signed the transaction
        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        // Only the program's upgrade authority may initialize
        Self::check_upgrade_authority(program_id, payer_info, program_data_info)?;

        config.validate()?;

        // The raffle lives at a single program address that also holds the pool
        let (expected_raffle, bump) = utils::find_raffle_address(program_id);
        if *raffle_info.key != expected_raffle {
            msg!("Invalid raffle account address");
            return Err(RaffleError::InvalidRaffleAccount.into());
        }
        if raffle_info.owner == program_id {
            msg!("Raffle account is already initialized");
            return Err(RaffleError::AlreadyInitialized.into());
        }

        let rent = Rent::get()?;
        let required_lamports = rent.minimum_balance(Raffle::LEN);
        let bump_seed = [bump];
        let raffle_seeds: &[&[u8]] = &[RAFFLE_SEED, &bump_seed];
        let create_accounts = [
            payer_info.clone(),
            raffle_info.clone(),
            system_program_info.clone(),
        ];

        if raffle_info.lamports() == 0 {
            invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    raffle_info.key,
                    required_lamports,
                    Raffle::LEN as u64,
                    program_id,
                ),
                &create_accounts,
                &[raffle_seeds],
            )?;
        } else {
            // create_account refuses a funded address; top up and claim it piecewise
            msg!(
                "Raffle address already holds {} lamports",
                raffle_info.lamports()
            );
            let top_up = required_lamports.saturating_sub(raffle_info.lamports());
            if top_up > 0 {
                invoke(
                    &system_instruction::transfer(payer_info.key, raffle_info.key, top_up),
                    &create_accounts,
                )?;
            }
            invoke_signed(
                &system_instruction::allocate(raffle_info.key, Raffle::LEN as u64),
                &[raffle_info.clone(), system_program_info.clone()],
                &[raffle_seeds],
            )?;
            invoke_signed(
                &system_instruction::assign(raffle_info.key, program_id),
                &[raffle_info.clone(), system_program_info.clone()],
                &[raffle_seeds],
            )?;
        }

        let clock = Clock::get()?;
        let raffle = Raffle::new(config, bump, clock.unix_timestamp);
        Self::save_raffle(&raffle, raffle_info)?;

        msg!(
            "Raffle initialized: entrance fee={} SOL, interval={}s, provider={}",
            utils::lamports_to_sol(config.entrance_fee),
            config.interval,
            config.vrf_program
        );
        Ok(())
    }

    /// Process EnterRaffle instruction
    fn process_enter_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify player is signer
        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        let event = raffle.enter(*player_info.key, amount)?;

        // Move the stake into the pool held by the raffle account
        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        Self::save_raffle(&raffle, raffle_info)?;
        event.emit();
        Ok(())
    }

    /// Process CheckUpkeep instruction. Read-only.
    fn process_check_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        check_data: &[u8],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(program_id, raffle_info)?;
        let clock = Clock::get()?;
        let check = raffle.check_upkeep(clock.unix_timestamp);

        msg!(
            "Upkeep needed={} (time passed={}, players={}, balance={}, open={}, check data={} bytes)",
            check.upkeep_needed(),
            check.time_passed,
            check.has_players,
            check.has_balance,
            check.is_open,
            check_data.len()
        );

        let status = raffle.upkeep_status(clock.unix_timestamp);
        let payload = status
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        set_return_data(&payload);
        Ok(())
    }

    /// Process PerformUpkeep instruction
    fn process_perform_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        perform_data: &[u8],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;
        let vrf_program_info = next_account_info(account_info_iter)?;
        let vrf_state_info = next_account_info(account_info_iter)?;
        let remaining_accounts = account_info_iter.as_slice();

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;

        if *vrf_program_info.key != raffle.config.vrf_program {
            msg!(
                "Randomness provider {} does not match configured {}",
                vrf_program_info.key,
                raffle.config.vrf_program
            );
            return Err(RaffleError::InvalidRandomnessProvider.into());
        }

        if !perform_data.is_empty() {
            msg!("Ignoring {} bytes of perform data", perform_data.len());
        }

        let clock = Clock::get()?;
        let bump = [raffle.bump];
        let consumer_seeds: &[&[u8]] = &[RAFFLE_SEED, &bump];
        let mut provider = CpiRandomnessProvider {
            vrf_program: vrf_program_info,
            consumer: raffle_info,
            provider_state: vrf_state_info,
            remaining_accounts,
            consumer_seeds,
        };

        let event = raffle.perform_upkeep(clock.unix_timestamp, &mut provider)?;

        Self::save_raffle(&raffle, raffle_info)?;
        event.emit();
        Ok(())
    }

    /// Process FulfillRandomWords instruction
    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_words: &[u64],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;

        // Only the provider may deliver randomness
        if !authority_info.is_signer || *authority_info.key != raffle.config.vrf_authority {
            msg!("Fulfillment must be signed by {}", raffle.config.vrf_authority);
            return Err(RaffleError::InvalidRandomnessAuthority.into());
        }

        let clock = Clock::get()?;
        let mut ledger = LamportLedger {
            vault: raffle_info,
            recipients: std::slice::from_ref(winner_info),
            rent: Rent::get()?,
        };

        let event =
            raffle.fulfill_random_words(request_id, random_words, clock.unix_timestamp, &mut ledger)?;

        Self::save_raffle(&raffle, raffle_info)?;
        event.emit();
        Ok(())
    }

    fn check_upgrade_authority(
        program_id: &Pubkey,
        authority_info: &AccountInfo,
        program_data_info: &AccountInfo,
    ) -> ProgramResult {
        if *program_data_info.key != utils::find_program_data_address(program_id)
            || *program_data_info.owner != bpf_loader_upgradeable::id()
        {
            msg!("Program data account does not belong to this program");
            return Err(RaffleError::InvalidProgramData.into());
        }

        let data = program_data_info.try_borrow_data()?;
        match utils::upgrade_authority(&data)? {
            Some(authority) if authority == *authority_info.key => Ok(()),
            authority => {
                msg!(
                    "Initializer {} is not the upgrade authority {:?}",
                    authority_info.key,
                    authority
                );
                Err(RaffleError::UnauthorizedInitializer.into())
            }
        }
    }

    fn load_raffle(program_id: &Pubkey, raffle_info: &AccountInfo) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        let (expected_raffle, _) = utils::find_raffle_address(program_id);
        if *raffle_info.key != expected_raffle {
            msg!("Invalid raffle account address");
            return Err(RaffleError::InvalidRaffleAccount.into());
        }

        let data = raffle_info.try_borrow_data()?;
        Raffle::unpack(&data)
    }

    fn save_raffle(raffle: &Raffle, raffle_info: &AccountInfo) -> ProgramResult {
        let mut data = raffle_info.try_borrow_mut_data()?;
        raffle.pack(&mut data)
    }
}
