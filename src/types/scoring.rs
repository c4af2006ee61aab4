use crate::types::features::FeatureSnapshot;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Baseline,
    DepositReward,
    RepaymentReward,
    ActivityReward,
    LiquidationPenalty,
    LowRepaymentPenalty,
    LeveragePenalty,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::Baseline,
        Rule::DepositReward,
        Rule::RepaymentReward,
        Rule::ActivityReward,
        Rule::LiquidationPenalty,
        Rule::LowRepaymentPenalty,
        Rule::LeveragePenalty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::DepositReward => "deposit_reward",
            Self::RepaymentReward => "repayment_reward",
            Self::ActivityReward => "activity_reward",
            Self::LiquidationPenalty => "liquidation_penalty",
            Self::LowRepaymentPenalty => "low_repayment_penalty",
            Self::LeveragePenalty => "leverage_penalty",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub rule: Rule,
    pub points: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletScore {
    pub score: u16,
    pub raw_total: Decimal,
    pub contributions: Vec<Contribution>,
    pub features: FeatureSnapshot,
}

impl WalletScore {
    pub fn points_for(&self, rule: Rule) -> Decimal {
        self.contributions
            .iter()
            .filter(|contribution| contribution.rule == rule)
            .map(|contribution| contribution.points)
            .sum()
    }
}
