pub mod penalties;
pub mod rewards;

use crate::error::IntegrityError;
use crate::types::config::{ScoringRules, SCORE_CEILING, SCORE_FLOOR};
use crate::types::features::WalletFeatures;
use crate::types::scoring::{Contribution, Rule, WalletScore};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn calculate(
    features: &WalletFeatures,
    rules: &ScoringRules,
) -> Result<WalletScore, IntegrityError> {
    features.check_integrity()?;

    let contributions = Rule::ALL
        .iter()
        .map(|&rule| Contribution {
            rule,
            points: rule_points(rule, features, rules).normalize(),
        })
        .collect::<Vec<_>>();

    let raw_total = contributions
        .iter()
        .fold(Decimal::ZERO, |total, contribution| {
            total.saturating_add(contribution.points)
        });

    Ok(WalletScore {
        score: finalize(raw_total, rules),
        raw_total: raw_total.normalize(),
        contributions,
        features: features.snapshot(),
    })
}

fn rule_points(rule: Rule, features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    match rule {
        Rule::Baseline => rules.baseline,
        Rule::DepositReward => rewards::deposit_reward(features, rules),
        Rule::RepaymentReward => rewards::repayment_reward(features, rules),
        Rule::ActivityReward => rewards::activity_reward(features, rules),
        Rule::LiquidationPenalty => penalties::liquidation_penalty(features, rules),
        Rule::LowRepaymentPenalty => penalties::low_repayment_penalty(features, rules),
        Rule::LeveragePenalty => penalties::leverage_penalty(features, rules),
    }
}

pub fn finalize(raw_total: Decimal, rules: &ScoringRules) -> u16 {
    // Not `clamp`: unvalidated rules may carry score_min > score_max, and the
    // upper bound wins then.
    raw_total
        .max(rules.score_min.max(SCORE_FLOOR))
        .min(rules.score_max.min(SCORE_CEILING))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u16()
        .unwrap_or_default()
}
