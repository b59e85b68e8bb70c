use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard balance snapshot of a brokerage account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_cash: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buying_power: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_absolute_return: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_percent_return: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_absolute_return: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_percent_return: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_cash: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_base_currency: Option<String>,
}

/// Balance snapshot of an FX-capable account, expressed in its base currency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxAccountOverview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value_base_currency: Option<Decimal>,
    #[serde(
        rename = "totalValueUSD",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_value_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buying_power_base_currency: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_profit_and_loss_base_currency: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realized_profit_and_loss_base_currency: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_balance_base_currency: Option<Decimal>,
}

/// Decoding and encoding of a balance snapshot to and from its JSON mapping.
pub trait Overview: Sized {
    fn decode(value: &Value) -> Result<Self, serde_json::Error>;
    fn encode(&self) -> Value;
}

impl Overview for AccountOverview {
    fn decode(value: &Value) -> Result<Self, serde_json::Error> {
        decode_object(value)
    }

    fn encode(&self) -> Value {
        encode_object(self)
    }
}

impl Overview for FxAccountOverview {
    fn decode(value: &Value) -> Result<Self, serde_json::Error> {
        decode_object(value)
    }

    fn encode(&self) -> Value {
        encode_object(self)
    }
}

#[inline]
fn decode_object<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    // serde maps a sequence onto a struct positionally; a snapshot must be a mapping
    if !value.is_object() {
        return Err(serde::de::Error::custom("expected a JSON object"));
    }
    T::deserialize(value)
}

#[inline]
fn encode_object<T: Serialize>(value: &T) -> Value {
    // only string keys and decimal/string values, which always serialize
    serde_json::to_value(value).expect("balance snapshot serializes to JSON")
}
