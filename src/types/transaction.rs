use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// USD values are held at whole cents so that sums over them are exact
// integer additions, independent of order.
pub const USD_SCALE: u32 = 2;

pub fn quantize_usd(value: Decimal) -> Option<Decimal> {
    let mut quantized =
        value.round_dp_with_strategy(USD_SCALE, RoundingStrategy::MidpointAwayFromZero);
    quantized.rescale(USD_SCALE);
    (quantized.scale() == USD_SCALE).then_some(quantized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    Liquidation,
    Redeem,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
            Self::Liquidation => "liquidation",
            Self::Redeem => "redeem",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "borrow" => Ok(Self::Borrow),
            "repay" => Ok(Self::Repay),
            "liquidationcall" | "liquidation" => Ok(Self::Liquidation),
            "redeemunderlying" | "redeem" => Ok(Self::Redeem),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub wallet_address: String,
    pub action: Action,
    pub amount_usd: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        wallet_address: impl Into<String>,
        action: Action,
        amount_usd: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            action,
            amount_usd,
            timestamp,
        }
    }
}
