// Automated Raffle Program - Prize ledger
use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey, rent::Rent};

use crate::error::RaffleError;

/// Value transfer out of the prize pool
pub trait Ledger {
    /// Move `amount` from the pool to `to`. Must either fully happen or leave
    /// every balance untouched.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), RaffleError>;

    fn balance_of(&self, account: &Pubkey) -> u64;
}

/// Pays out lamports held by the raffle account. Only the recipients passed in
/// can be paid, and the vault is never drained below its rent-exempt minimum.
pub struct LamportLedger<'a, 'b> {
    pub vault: &'a AccountInfo<'b>,
    pub recipients: &'a [AccountInfo<'b>],
    pub rent: Rent,
}

impl<'a, 'b> LamportLedger<'a, 'b> {
    fn recipient(&self, key: &Pubkey) -> Option<&'a AccountInfo<'b>> {
        self.recipients.iter().find(|info| info.key == key)
    }
}

impl<'a, 'b> Ledger for LamportLedger<'a, 'b> {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), RaffleError> {
        let recipient = self.recipient(to).ok_or_else(|| {
            msg!("Recipient {} was not supplied", to);
            RaffleError::TransferFailed
        })?;
        if !recipient.is_writable {
            msg!("Recipient {} is not writable", to);
            return Err(RaffleError::TransferFailed);
        }

        let vault_balance = self.vault.lamports();
        let rent_floor = self.rent.minimum_balance(self.vault.data_len());
        let remaining = vault_balance
            .checked_sub(amount)
            .filter(|left| *left >= rent_floor)
            .ok_or_else(|| {
                msg!(
                    "Vault holds {} lamports, cannot pay {} and keep {} for rent",
                    vault_balance,
                    amount,
                    rent_floor
                );
                RaffleError::TransferFailed
            })?;
        let credited = recipient
            .lamports()
            .checked_add(amount)
            .ok_or(RaffleError::TransferFailed)?;

        let mut vault_lamports = self
            .vault
            .try_borrow_mut_lamports()
            .map_err(|_| RaffleError::TransferFailed)?;
        let mut recipient_lamports = recipient
            .try_borrow_mut_lamports()
            .map_err(|_| RaffleError::TransferFailed)?;
        **vault_lamports = remaining;
        **recipient_lamports = credited;

        msg!("Transferred {} lamports to {}", amount, to);
        Ok(())
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        if self.vault.key == account {
            return self.vault.lamports();
        }
        self.recipient(account)
            .map(|info| info.lamports())
            .unwrap_or_default()
    }
}
