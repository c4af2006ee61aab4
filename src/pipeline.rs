use crate::aggregate;
use crate::error::IntegrityError;
use crate::ingest::Input;
use crate::score;
use crate::types::config::ScoringRules;
use crate::types::features::FeatureMap;
use crate::types::report::{RunSummary, ScoreBucket, ScoreReport};
use crate::types::scoring::WalletScore;
use crate::types::transaction::Transaction;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const BUCKET_WIDTH: u16 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoredWallets {
    pub scores: BTreeMap<String, WalletScore>,
    pub excluded: BTreeMap<String, IntegrityError>,
}

pub fn run(input: &Input, rules: &ScoringRules) -> ScoreReport {
    let features = features_for(input);
    let scored = score_wallets(&features, rules);
    let rejected = input.rejected().cloned().collect::<Vec<_>>();

    let mut rejections_by_reason = BTreeMap::new();
    for record in &rejected {
        *rejections_by_reason
            .entry(record.reason.kind().to_string())
            .or_insert(0) += 1;
    }

    let records_seen = input.records_seen();
    let mut summary = RunSummary {
        records_seen,
        records_accepted: records_seen - rejected.len(),
        records_rejected: rejected.len(),
        rejections_by_reason,
        wallets_scored: scored.scores.len(),
        wallets_excluded: scored.excluded.len(),
        ..RunSummary::default()
    };
    summarize_scores(&mut summary, &scored.scores);

    tracing::info!(
        records = summary.records_seen,
        rejected = summary.records_rejected,
        wallets = summary.wallets_scored,
        excluded = summary.wallets_excluded,
        "scoring complete"
    );

    ScoreReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        input_sha256: input.sha256.clone(),
        rules: *rules,
        summary,
        scores: scored.scores,
        excluded: scored.excluded,
        rejected,
    }
}

pub fn features_for(input: &Input) -> FeatureMap {
    let shards = input
        .shards
        .iter()
        .map(|shard| shard.transactions.as_slice())
        .collect::<Vec<&[Transaction]>>();
    aggregate::aggregate_shards(&shards)
}

pub fn score_wallets(features: &FeatureMap, rules: &ScoringRules) -> ScoredWallets {
    let results = features
        .par_iter()
        .map(|(wallet, features)| (wallet.clone(), score::calculate(features, rules)))
        .collect::<Vec<_>>();

    let mut scored = ScoredWallets::default();
    for (wallet, result) in results {
        match result {
            Ok(score) => {
                scored.scores.insert(wallet, score);
            }
            Err(reason) => {
                tracing::warn!(%wallet, %reason, "excluding wallet with inconsistent features");
                scored.excluded.insert(wallet, reason);
            }
        }
    }
    scored
}

fn summarize_scores(summary: &mut RunSummary, scores: &BTreeMap<String, WalletScore>) {
    summary.score_min = scores.values().map(|wallet| wallet.score).min();
    summary.score_max = scores.values().map(|wallet| wallet.score).max();
    if !scores.is_empty() {
        let total: Decimal = scores.values().map(|wallet| Decimal::from(wallet.score)).sum();
        summary.score_mean = Some((total / Decimal::from(scores.len())).round_dp(2));
    }

    let mut distribution = (0..10u16)
        .map(|bucket| ScoreBucket {
            lower: bucket * BUCKET_WIDTH,
            upper: if bucket == 9 { 1000 } else { (bucket + 1) * BUCKET_WIDTH - 1 },
            wallets: 0,
        })
        .collect::<Vec<_>>();
    for wallet in scores.values() {
        let index = usize::from((wallet.score / BUCKET_WIDTH).min(9));
        distribution[index].wallets += 1;
    }
    summary.distribution = distribution;
}
