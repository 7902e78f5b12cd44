//! Fungible token with a minter list.

use crate::domain::{ProgramError, StateKey, StateValue};
use shared_types::{Address, OnchainId, U256};
use std::collections::{BTreeSet, HashMap};

/// Token storage.
#[derive(Clone, Debug)]
pub struct TokenProgram {
    id: OnchainId,
    name: String,
    symbol: String,
    decimals: u8,
    minters: BTreeSet<OnchainId>,
    balances: HashMap<Address, U256>,
    total_supply: U256,
}

impl TokenProgram {
    /// New token; the installer can mint.
    pub fn new(
        id: OnchainId,
        name: String,
        symbol: String,
        decimals: u8,
        owner: Address,
    ) -> Self {
        let mut minters = BTreeSet::new();
        minters.insert(OnchainId::new(owner));
        Self {
            id,
            name,
            symbol,
            decimals,
            minters,
            balances: HashMap::new(),
            total_supply: U256::zero(),
        }
    }

    /// Grant minting rights. Returns false if already a minter.
    pub fn add_minter(&mut self, minter: OnchainId) -> bool {
        self.minters.insert(minter)
    }

    /// Whether `account` may mint.
    pub fn is_minter(&self, account: &OnchainId) -> bool {
        self.minters.contains(account)
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Mint `amount` to `to` on behalf of `caller`.
    pub fn mint(
        &mut self,
        caller: OnchainId,
        to: Address,
        amount: U256,
    ) -> Result<(), ProgramError> {
        if !self.is_minter(&caller) {
            return Err(ProgramError::NotMinter {
                token: self.id,
                account: caller,
            });
        }
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ProgramError::Overflow)?;
        let balance = self.balances.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or(ProgramError::Overflow)?;
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), ProgramError> {
        self.debit(from, amount)?;
        let balance = self.balances.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or(ProgramError::Overflow)?;
        Ok(())
    }

    /// Destroy `amount` held by `from`.
    pub fn burn(&mut self, from: Address, amount: U256) -> Result<(), ProgramError> {
        self.debit(from, amount)?;
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(())
    }

    fn debit(&mut self, from: Address, amount: U256) -> Result<(), ProgramError> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(ProgramError::InsufficientBalance {
                token: self.id,
                account: OnchainId::new(from),
                needed: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        Ok(())
    }

    /// Token decimals.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub(crate) fn read(&self, key: &StateKey) -> Option<StateValue> {
        Some(match key {
            StateKey::Balance(account) => StateValue::Amount(self.balance_of(account)),
            StateKey::Decimals => StateValue::Int(u64::from(self.decimals)),
            StateKey::TotalSupply => StateValue::Amount(self.total_supply),
            StateKey::Minters => StateValue::Ids(self.minters.iter().copied().collect()),
            StateKey::Name => StateValue::Text(self.name.clone()),
            StateKey::Symbol => StateValue::Text(self.symbol.clone()),
            _ => return None,
        })
    }
}
