use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Missing or invalid required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Failed to decode nested field {field}: {source}")]
    NestedDecode {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("Invalid timestamp in {field}: {value}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
    #[error("Optional field has an unexpected type: {0}")]
    InvalidOptionalField(&'static str),
    #[error("Account payload is not a JSON object")]
    NotAnObject,
    #[error("Malformed JSON: {0}")]
    Json(serde_json::Error),
}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Account not found: {account_number}/{account_index}")]
    AccountNotFound {
        account_number: String,
        account_index: String,
    },
    #[error("Invalid account payload: {0}")]
    Decode(DecodeError),
}

impl From<DecodeError> for CacheError {
    fn from(error: DecodeError) -> Self {
        Self::Decode(error)
    }
}
