use crate::error::ScoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletScoreConfig {
    pub rules: Option<RulesConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default, deserialize_with = "rule_value")]
    pub baseline: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub score_min: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub score_max: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub deposit_unit_usd: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub deposit_reward_cap: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub repayment_reward_max: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub activity_reward_cap: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub activity_full_credit_days: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub liquidation_penalty: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub low_repayment_threshold: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub low_repayment_penalty_max: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub leverage_multiple: Option<Decimal>,
    #[serde(default, deserialize_with = "rule_value")]
    pub leverage_penalty_max: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringRules {
    pub baseline: Decimal,
    pub score_min: Decimal,
    pub score_max: Decimal,
    pub deposit_unit_usd: Decimal,
    pub deposit_reward_cap: Decimal,
    pub repayment_reward_max: Decimal,
    pub activity_reward_cap: Decimal,
    pub activity_full_credit_days: Decimal,
    pub liquidation_penalty: Decimal,
    pub low_repayment_threshold: Decimal,
    pub low_repayment_penalty_max: Decimal,
    pub leverage_multiple: Decimal,
    pub leverage_penalty_max: Decimal,
}

pub const SCORE_FLOOR: Decimal = dec!(0);
pub const SCORE_CEILING: Decimal = dec!(1000);

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            baseline: dec!(500),
            score_min: SCORE_FLOOR,
            score_max: SCORE_CEILING,
            deposit_unit_usd: dec!(1000),
            deposit_reward_cap: dec!(200),
            repayment_reward_max: dec!(150),
            activity_reward_cap: dec!(20),
            activity_full_credit_days: dec!(365),
            liquidation_penalty: dec!(400),
            low_repayment_threshold: dec!(0.5),
            low_repayment_penalty_max: dec!(100),
            leverage_multiple: dec!(1),
            leverage_penalty_max: dec!(75),
        }
    }
}

impl WalletScoreConfig {
    pub fn rules(&self) -> ScoringRules {
        let defaults = ScoringRules::default();
        match &self.rules {
            Some(rules) => ScoringRules {
                baseline: rules.baseline.unwrap_or(defaults.baseline),
                score_min: rules.score_min.unwrap_or(defaults.score_min),
                score_max: rules.score_max.unwrap_or(defaults.score_max),
                deposit_unit_usd: rules.deposit_unit_usd.unwrap_or(defaults.deposit_unit_usd),
                deposit_reward_cap: rules
                    .deposit_reward_cap
                    .unwrap_or(defaults.deposit_reward_cap),
                repayment_reward_max: rules
                    .repayment_reward_max
                    .unwrap_or(defaults.repayment_reward_max),
                activity_reward_cap: rules
                    .activity_reward_cap
                    .unwrap_or(defaults.activity_reward_cap),
                activity_full_credit_days: rules
                    .activity_full_credit_days
                    .unwrap_or(defaults.activity_full_credit_days),
                liquidation_penalty: rules
                    .liquidation_penalty
                    .unwrap_or(defaults.liquidation_penalty),
                low_repayment_threshold: rules
                    .low_repayment_threshold
                    .unwrap_or(defaults.low_repayment_threshold),
                low_repayment_penalty_max: rules
                    .low_repayment_penalty_max
                    .unwrap_or(defaults.low_repayment_penalty_max),
                leverage_multiple: rules.leverage_multiple.unwrap_or(defaults.leverage_multiple),
                leverage_penalty_max: rules
                    .leverage_penalty_max
                    .unwrap_or(defaults.leverage_penalty_max),
            },
            None => defaults,
        }
    }
}

impl ScoringRules {
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.score_min < SCORE_FLOOR || self.score_max > SCORE_CEILING {
            return Err(ScoreError::ConfigParse(format!(
                "rules.score_min and rules.score_max must lie within [{SCORE_FLOOR}, {SCORE_CEILING}]"
            )));
        }
        if self.score_min > self.score_max {
            return Err(ScoreError::ConfigParse(format!(
                "rules.score_min ({}) must not exceed rules.score_max ({})",
                self.score_min, self.score_max
            )));
        }
        if !(self.score_min..=self.score_max).contains(&self.baseline) {
            return Err(ScoreError::ConfigParse(
                "rules.baseline must lie between rules.score_min and rules.score_max".to_string(),
            ));
        }

        for (key, value) in [
            ("deposit_reward_cap", self.deposit_reward_cap),
            ("repayment_reward_max", self.repayment_reward_max),
            ("activity_reward_cap", self.activity_reward_cap),
            ("liquidation_penalty", self.liquidation_penalty),
            ("low_repayment_penalty_max", self.low_repayment_penalty_max),
            ("leverage_penalty_max", self.leverage_penalty_max),
        ] {
            if value < Decimal::ZERO {
                return Err(ScoreError::ConfigParse(format!(
                    "rules.{key} must not be negative (found {value})"
                )));
            }
        }

        for (key, value) in [
            ("deposit_unit_usd", self.deposit_unit_usd),
            ("activity_full_credit_days", self.activity_full_credit_days),
            ("leverage_multiple", self.leverage_multiple),
        ] {
            if value <= Decimal::ZERO {
                return Err(ScoreError::ConfigParse(format!(
                    "rules.{key} must be greater than 0 (found {value})"
                )));
            }
        }

        let reward_caps = self
            .deposit_reward_cap
            .saturating_add(self.repayment_reward_max)
            .saturating_add(self.activity_reward_cap);
        if self.liquidation_penalty <= reward_caps {
            return Err(ScoreError::ConfigParse(format!(
                "rules.liquidation_penalty ({}) must exceed the combined reward caps ({reward_caps})",
                self.liquidation_penalty
            )));
        }

        if self.low_repayment_threshold <= Decimal::ZERO
            || self.low_repayment_threshold > Decimal::ONE
        {
            return Err(ScoreError::ConfigParse(format!(
                "rules.low_repayment_threshold must be in (0, 1] (found {})",
                self.low_repayment_threshold
            )));
        }

        Ok(())
    }
}

// TOML floats are binary; accept only integers and quoted decimal strings so
// that `0.1` in a config file means exactly 0.1.
fn rule_value<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RuleValue;

    impl<'de> Visitor<'de> for RuleValue {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a quoted decimal string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Err(E::custom(format!(
                "float {value} is not exact; use an integer or a quoted decimal string"
            )))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Decimal::from_str(value.trim())
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(RuleValue)
}
