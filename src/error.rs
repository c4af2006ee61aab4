use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("input not found: {0}")]
    InputNotFound(String),

    #[error("input parse error: {0}")]
    InputParse(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("wallet not found in input: {0}")]
    WalletNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid decimal in {field}: {value}")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("negative value in {0}")]
    NegativeValue(&'static str),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("usd value does not fit at cent precision")]
    AmountOverflow,
}

impl RecordError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::MissingField(_) => "missing_field",
            Self::UnknownAction(_) => "unknown_action",
            Self::InvalidDecimal { .. } => "invalid_decimal",
            Self::NegativeValue(_) => "negative_value",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::AmountOverflow => "amount_overflow",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IntegrityError {
    #[error("negative total in {field}: {value}")]
    NegativeTotal { field: &'static str, value: Decimal },

    #[error("accumulated total overflowed")]
    Overflow,

    #[error("first_seen is after last_seen")]
    InvertedSpan,
}
