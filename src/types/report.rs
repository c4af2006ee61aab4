use crate::error::IntegrityError;
use crate::ingest::RejectedRecord;
use crate::types::config::ScoringRules;
use crate::types::scoring::WalletScore;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

// No wall-clock data: the same input and rules serialize to the same bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub version: String,
    pub input_sha256: String,
    pub rules: ScoringRules,
    pub summary: RunSummary,
    pub scores: BTreeMap<String, WalletScore>,
    pub excluded: BTreeMap<String, IntegrityError>,
    pub rejected: Vec<RejectedRecord>,
}

impl ScoreReport {
    pub fn has_warnings(&self) -> bool {
        !self.rejected.is_empty() || !self.excluded.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records_seen: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
    pub rejections_by_reason: BTreeMap<String, usize>,
    pub wallets_scored: usize,
    pub wallets_excluded: usize,
    pub score_min: Option<u16>,
    pub score_max: Option<u16>,
    pub score_mean: Option<Decimal>,
    pub distribution: Vec<ScoreBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub lower: u16,
    pub upper: u16,
    pub wallets: usize,
}
