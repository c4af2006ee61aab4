use crate::types::features::{FeatureMap, FeatureSnapshot};
use crate::types::report::ScoreReport;
use std::collections::BTreeMap;

pub fn to_json(report: &ScoreReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn features_to_json(features: &FeatureMap) -> Result<String, serde_json::Error> {
    let snapshots = features
        .iter()
        .map(|(wallet, features)| (wallet.as_str(), features.snapshot()))
        .collect::<BTreeMap<&str, FeatureSnapshot>>();
    serde_json::to_string_pretty(&snapshots)
}
