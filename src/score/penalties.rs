use crate::types::config::ScoringRules;
use crate::types::features::WalletFeatures;
use rust_decimal::Decimal;

pub fn liquidation_penalty(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    -rules
        .liquidation_penalty
        .checked_mul(Decimal::from(features.liquidation_count))
        .unwrap_or(Decimal::MAX)
}

pub fn low_repayment_penalty(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    match features.repay_to_borrow_ratio() {
        Some(ratio) if ratio < rules.low_repayment_threshold => {
            let shortfall = (rules.low_repayment_threshold - ratio) / rules.low_repayment_threshold;
            -(rules.low_repayment_penalty_max * shortfall)
        }
        _ => Decimal::ZERO,
    }
}

pub fn leverage_penalty(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    let Some(allowance) = features
        .total_deposited_usd
        .checked_mul(rules.leverage_multiple)
    else {
        return Decimal::ZERO;
    };
    if features.total_borrowed_usd <= allowance {
        return Decimal::ZERO;
    }
    let excess_share = (features.total_borrowed_usd - allowance) / features.total_borrowed_usd;
    -(rules.leverage_penalty_max * excess_share)
}
