use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::overview::{AccountOverview, FxAccountOverview, Overview};

pub const ACCOUNT_NAME: &str = "accountName";
pub const ACCOUNT_NUMBER: &str = "accountNumber";
pub const ACCOUNT_INDEX: &str = "accountIndex";
pub const ACCOUNT_BASE_CURRENCY: &str = "accountBaseCurrency";
pub const BALANCE_LAST_UPDATED: &str = "balanceLastUpdated";
pub const BALANCE: &str = "balance";
pub const FX_BALANCE: &str = "fxBalance";
pub const IS_ENABLED: &str = "isEnabled";

// ISO-8601 with a colon-less offset, e.g. 2024-01-01T00:00:00+0000
const ISO_8601_COMPACT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Snapshot of one linked brokerage account as last observed by the client.
///
/// Optional fields are `None` when the payload did not carry them; they are
/// never filled with an empty string or a zero amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLinkedBrokerAccount {
    account_name: String,
    account_number: String,
    account_index: String,
    account_base_currency: String,
    balance_last_updated: Option<DateTime<Utc>>,
    balance: Option<AccountOverview>,
    fx_balance: Option<FxAccountOverview>,
    is_enabled: bool,
}

impl CachedLinkedBrokerAccount {
    pub fn new(
        account_name: impl Into<String>,
        account_number: impl Into<String>,
        account_index: impl Into<String>,
        account_base_currency: impl Into<String>,
        is_enabled: bool,
    ) -> Self {
        CachedLinkedBrokerAccount {
            account_name: account_name.into(),
            account_number: account_number.into(),
            account_index: account_index.into(),
            account_base_currency: account_base_currency.into(),
            balance_last_updated: None,
            balance: None,
            fx_balance: None,
            is_enabled,
        }
    }

    pub fn decode(object: &Map<String, Value>) -> Result<Self, DecodeError> {
        Ok(CachedLinkedBrokerAccount {
            account_name: required_str(object, ACCOUNT_NAME)?,
            account_number: required_str(object, ACCOUNT_NUMBER)?,
            account_index: required_str(object, ACCOUNT_INDEX)?,
            account_base_currency: required_str(object, ACCOUNT_BASE_CURRENCY)?,
            balance_last_updated: optional_timestamp(object, BALANCE_LAST_UPDATED)?,
            balance: optional_nested(object, BALANCE)?,
            fx_balance: optional_nested(object, FX_BALANCE)?,
            is_enabled: required_bool(object, IS_ENABLED)?,
        })
    }

    pub fn from_json_str(payload: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(payload)?;
        value.try_into()
    }

    pub fn encode(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert(ACCOUNT_NAME.into(), self.account_name.clone().into());
        object.insert(ACCOUNT_NUMBER.into(), self.account_number.clone().into());
        object.insert(ACCOUNT_INDEX.into(), self.account_index.clone().into());
        object.insert(
            ACCOUNT_BASE_CURRENCY.into(),
            self.account_base_currency.clone().into(),
        );
        if let Some(updated) = &self.balance_last_updated {
            object.insert(
                BALANCE_LAST_UPDATED.into(),
                updated.to_rfc3339_opts(SecondsFormat::AutoSi, true).into(),
            );
        }
        if let Some(balance) = &self.balance {
            object.insert(BALANCE.into(), balance.encode());
        }
        if let Some(fx_balance) = &self.fx_balance {
            object.insert(FX_BALANCE.into(), fx_balance.encode());
        }
        object.insert(IS_ENABLED.into(), self.is_enabled.into());
        object
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.encode()).to_string()
    }

    /// Identity of the account within a list of linked accounts.
    pub fn key(&self) -> (&str, &str) {
        (&self.account_number, &self.account_index)
    }

    pub fn has_balance(&self) -> bool {
        self.balance.is_some() || self.fx_balance.is_some()
    }

    pub fn refresh_balance(&mut self, balance: AccountOverview, at: DateTime<Utc>) {
        self.balance = Some(balance);
        self.balance_last_updated = Some(at);
    }

    pub fn refresh_fx_balance(&mut self, fx_balance: FxAccountOverview, at: DateTime<Utc>) {
        self.fx_balance = Some(fx_balance);
        self.balance_last_updated = Some(at);
    }

    pub fn clear_balances(&mut self) {
        self.balance = None;
        self.fx_balance = None;
        self.balance_last_updated = None;
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn set_account_name(&mut self, account_name: impl Into<String>) {
        self.account_name = account_name.into();
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn set_account_number(&mut self, account_number: impl Into<String>) {
        self.account_number = account_number.into();
    }

    pub fn account_index(&self) -> &str {
        &self.account_index
    }

    pub fn set_account_index(&mut self, account_index: impl Into<String>) {
        self.account_index = account_index.into();
    }

    pub fn account_base_currency(&self) -> &str {
        &self.account_base_currency
    }

    pub fn set_account_base_currency(&mut self, account_base_currency: impl Into<String>) {
        self.account_base_currency = account_base_currency.into();
    }

    pub fn balance_last_updated(&self) -> Option<DateTime<Utc>> {
        self.balance_last_updated
    }

    pub fn set_balance_last_updated(&mut self, balance_last_updated: Option<DateTime<Utc>>) {
        self.balance_last_updated = balance_last_updated;
    }

    pub fn balance(&self) -> Option<&AccountOverview> {
        self.balance.as_ref()
    }

    pub fn set_balance(&mut self, balance: Option<AccountOverview>) {
        self.balance = balance;
    }

    pub fn fx_balance(&self) -> Option<&FxAccountOverview> {
        self.fx_balance.as_ref()
    }

    pub fn set_fx_balance(&mut self, fx_balance: Option<FxAccountOverview>) {
        self.fx_balance = fx_balance;
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn set_enabled(&mut self, is_enabled: bool) {
        self.is_enabled = is_enabled;
    }
}

impl TryFrom<&Value> for CachedLinkedBrokerAccount {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
        Self::decode(object)
    }
}

impl TryFrom<Value> for CachedLinkedBrokerAccount {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl From<&CachedLinkedBrokerAccount> for Value {
    fn from(account: &CachedLinkedBrokerAccount) -> Self {
        Value::Object(account.encode())
    }
}

#[inline]
fn required_str(object: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(DecodeError::MissingRequiredField(field))
}

#[inline]
fn required_bool(object: &Map<String, Value>, field: &'static str) -> Result<bool, DecodeError> {
    object
        .get(field)
        .and_then(Value::as_bool)
        .ok_or(DecodeError::MissingRequiredField(field))
}

#[inline]
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn optional_timestamp(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    let Some(value) = present(object, field) else {
        return Ok(None);
    };
    let text = value
        .as_str()
        .ok_or(DecodeError::InvalidOptionalField(field))?;

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, ISO_8601_COMPACT_OFFSET))
        .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
        .map_err(|source| DecodeError::InvalidTimestamp {
            field,
            value: text.to_owned(),
            source,
        })
}

fn optional_nested<T: Overview>(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    present(object, field)
        .map(T::decode)
        .transpose()
        .map_err(|source| DecodeError::NestedDecode { field, source })
}
