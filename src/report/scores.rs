use crate::types::report::ScoreReport;
use std::collections::BTreeMap;

pub fn to_score_map(report: &ScoreReport) -> Result<String, serde_json::Error> {
    let scores = report
        .scores
        .iter()
        .map(|(wallet, scored)| (wallet.as_str(), scored.score))
        .collect::<BTreeMap<_, _>>();
    serde_json::to_string_pretty(&scores)
}
