use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::account::CachedLinkedBrokerAccount;
use crate::error::CacheError;
use crate::overview::{AccountOverview, FxAccountOverview};

pub type AccountsByIndex = BTreeMap<String, CachedLinkedBrokerAccount>;
pub type Accounts = BTreeMap<String, AccountsByIndex>;

/// In-memory set of linked accounts, keyed by account number then account index.
pub struct AccountCache {
    accounts: Accounts,
}

impl Default for AccountCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountCache {
    pub fn new() -> Self {
        AccountCache {
            accounts: Accounts::new(),
        }
    }

    /// Stores the account, returning the entry it replaced if the key was taken.
    pub fn insert(
        &mut self,
        account: CachedLinkedBrokerAccount,
    ) -> Option<CachedLinkedBrokerAccount> {
        let by_index = self
            .accounts
            .entry(account.account_number().to_owned())
            .or_default();
        by_index.insert(account.account_index().to_owned(), account)
    }

    #[inline]
    pub fn get(&self, account_number: &str, account_index: &str) -> Option<&CachedLinkedBrokerAccount> {
        self.accounts
            .get(account_number)
            .and_then(|a| a.get(account_index))
    }

    #[inline]
    fn get_mut(
        &mut self,
        account_number: &str,
        account_index: &str,
    ) -> Option<&mut CachedLinkedBrokerAccount> {
        self.accounts
            .get_mut(account_number)
            .and_then(|a| a.get_mut(account_index))
    }

    /// Applies `change` to a cached account, re-filing it if its number or
    /// index changed. An account already filed under the new key is replaced.
    pub fn update(
        &mut self,
        account_number: &str,
        account_index: &str,
        change: impl FnOnce(&mut CachedLinkedBrokerAccount),
    ) -> Result<(), CacheError> {
        let account = self.existing_account(account_number, account_index)?;
        change(account);

        if account.key() != (account_number, account_index) {
            if let Some(moved) = self.remove(account_number, account_index) {
                if let Some(previous) = self.insert(moved) {
                    let (number, index) = previous.key();
                    log::debug!("Replaced cached account {}/{}", number, index);
                }
            }
        }
        Ok(())
    }

    pub fn find_by_number(
        &self,
        account_number: &str,
    ) -> impl Iterator<Item = &CachedLinkedBrokerAccount> {
        self.accounts
            .get(account_number)
            .into_iter()
            .flat_map(|a| a.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedLinkedBrokerAccount> {
        self.accounts.values().flat_map(|a| a.values())
    }

    pub fn enabled(&self) -> impl Iterator<Item = &CachedLinkedBrokerAccount> {
        self.iter().filter(|a| a.is_enabled())
    }

    /// Drops an unlinked account.
    pub fn remove(
        &mut self,
        account_number: &str,
        account_index: &str,
    ) -> Option<CachedLinkedBrokerAccount> {
        let by_index = self.accounts.get_mut(account_number)?;
        let removed = by_index.remove(account_index);

        if by_index.is_empty() {
            self.accounts.remove(account_number);
        }
        if removed.is_some() {
            log::debug!("Unlinked account {}/{}", account_number, account_index);
        }
        removed
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing {} cached accounts", self.len());
        self.accounts.clear();
    }

    pub fn len(&self) -> usize {
        self.accounts.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn refresh_balance(
        &mut self,
        account_number: &str,
        account_index: &str,
        balance: AccountOverview,
        at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.existing_account(account_number, account_index)?
            .refresh_balance(balance, at);
        Ok(())
    }

    pub fn refresh_fx_balance(
        &mut self,
        account_number: &str,
        account_index: &str,
        fx_balance: FxAccountOverview,
        at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.existing_account(account_number, account_index)?
            .refresh_fx_balance(fx_balance, at);
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.iter().map(Value::from).collect())
    }

    #[inline]
    fn existing_account(
        &mut self,
        account_number: &str,
        account_index: &str,
    ) -> Result<&mut CachedLinkedBrokerAccount, CacheError> {
        self.get_mut(account_number, account_index)
            .ok_or_else(|| CacheError::AccountNotFound {
                account_number: account_number.to_owned(),
                account_index: account_index.to_owned(),
            })
    }
}

impl Display for AccountCache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "account_number, account_index, account_name, base_currency, enabled, balance_last_updated"
        )?;

        for account in self.iter() {
            let updated = account
                .balance_last_updated()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_else(|| "-".to_owned());
            writeln!(
                f,
                "{}, {}, {}, {}, {}, {}",
                account.account_number(),
                account.account_index(),
                account.account_name(),
                account.account_base_currency(),
                account.is_enabled(),
                updated
            )?;
        }
        Ok(())
    }
}
