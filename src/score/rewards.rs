use crate::types::config::ScoringRules;
use crate::types::features::WalletFeatures;
use rust_decimal::Decimal;

pub fn deposit_reward(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    features
        .total_deposited_usd
        .checked_div(rules.deposit_unit_usd)
        .unwrap_or(Decimal::MAX)
        .min(rules.deposit_reward_cap)
}

pub fn repayment_reward(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    match features.repay_to_borrow_ratio() {
        Some(ratio) => rules.repayment_reward_max * ratio.min(Decimal::ONE),
        None => Decimal::ZERO,
    }
}

pub fn activity_reward(features: &WalletFeatures, rules: &ScoringRules) -> Decimal {
    let progress = features
        .activity_span_days()
        .checked_div(rules.activity_full_credit_days)
        .unwrap_or(Decimal::MAX)
        .min(Decimal::ONE);
    rules.activity_reward_cap * progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::{Action, Transaction};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn features(deposited: Decimal, borrowed: Decimal, repaid: Decimal) -> WalletFeatures {
        let start = Utc.timestamp_opt(1_600_000_000, 0).single().expect("valid timestamp");
        let mut features =
            WalletFeatures::from_transaction(&Transaction::new("w", Action::Deposit, deposited, start));
        features.total_borrowed_usd = borrowed;
        features.total_repaid_usd = repaid;
        features
    }

    #[test]
    fn deposit_reward_scales_then_caps() {
        let rules = ScoringRules::default();
        assert_eq!(deposit_reward(&features(dec!(0), dec!(0), dec!(0)), &rules), dec!(0));
        assert_eq!(deposit_reward(&features(dec!(1500), dec!(0), dec!(0)), &rules), dec!(1.5));
        assert_eq!(
            deposit_reward(&features(dec!(200000), dec!(0), dec!(0)), &rules),
            dec!(200)
        );
        assert_eq!(
            deposit_reward(&features(dec!(9000000), dec!(0), dec!(0)), &rules),
            dec!(200)
        );
    }

    #[test]
    fn repayment_reward_is_proportional_and_capped() {
        let rules = ScoringRules::default();
        assert_eq!(repayment_reward(&features(dec!(0), dec!(0), dec!(0)), &rules), dec!(0));
        assert_eq!(
            repayment_reward(&features(dec!(0), dec!(100), dec!(50)), &rules),
            dec!(75)
        );
        assert_eq!(
            repayment_reward(&features(dec!(0), dec!(100), dec!(100)), &rules),
            dec!(150)
        );
        assert_eq!(
            repayment_reward(&features(dec!(0), dec!(100), dec!(400)), &rules),
            dec!(150)
        );
    }

    #[test]
    fn activity_reward_grows_with_span() {
        let rules = ScoringRules::default();
        let mut f = features(dec!(1), dec!(0), dec!(0));
        assert_eq!(activity_reward(&f, &rules), dec!(0));

        f.last_seen = f.first_seen + Duration::days(73);
        assert_eq!(activity_reward(&f, &rules), dec!(4));

        f.last_seen = f.first_seen + Duration::days(365 * 3);
        assert_eq!(activity_reward(&f, &rules), dec!(20));
    }
}
