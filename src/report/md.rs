use crate::types::report::ScoreReport;
use crate::types::scoring::WalletScore;

const EXTREMES_SHOWN: usize = 10;

pub fn to_markdown(report: &ScoreReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();
    output.push_str("# Wallet Credit Scores\n\n");
    output.push_str(&format!("Input digest: `{}`\n\n", report.input_sha256));

    output.push_str("## Summary\n\n");
    output.push_str(&format!(
        "- records: {} seen, {} accepted, {} rejected\n- wallets: {} scored, {} excluded\n",
        summary.records_seen,
        summary.records_accepted,
        summary.records_rejected,
        summary.wallets_scored,
        summary.wallets_excluded
    ));
    if let (Some(min), Some(max), Some(mean)) =
        (summary.score_min, summary.score_max, summary.score_mean)
    {
        output.push_str(&format!("- score range: {min}..={max}, mean {mean}\n"));
    }
    for (reason, count) in &summary.rejections_by_reason {
        output.push_str(&format!("- rejected ({reason}): {count}\n"));
    }
    output.push('\n');

    output.push_str("## Distribution\n\n");
    output.push_str("| range | wallets |\n|---|---|\n");
    for bucket in &summary.distribution {
        output.push_str(&format!(
            "| {}-{} | {} |\n",
            bucket.lower, bucket.upper, bucket.wallets
        ));
    }
    output.push('\n');

    let mut ranked = report.scores.iter().collect::<Vec<_>>();
    ranked.sort_by(|(a_wallet, a), (b_wallet, b)| {
        b.score.cmp(&a.score).then_with(|| a_wallet.cmp(b_wallet))
    });

    output.push_str("## Highest Scores\n\n");
    push_wallets(&mut output, ranked.iter().take(EXTREMES_SHOWN).copied());
    output.push_str("## Lowest Scores\n\n");
    push_wallets(&mut output, ranked.iter().rev().take(EXTREMES_SHOWN).copied());

    output.push_str("## Excluded Wallets\n\n");
    if report.excluded.is_empty() {
        output.push_str("- none\n");
    } else {
        for (wallet, reason) in &report.excluded {
            output.push_str(&format!("- {wallet}: {reason}\n"));
        }
    }

    output
}

fn push_wallets<'a>(output: &mut String, wallets: impl Iterator<Item = (&'a String, &'a WalletScore)>) {
    let mut any = false;
    for (wallet, scored) in wallets {
        any = true;
        output.push_str(&format!(
            "- {wallet}: {} (deposited {} USD, liquidations {})\n",
            scored.score, scored.features.total_deposited_usd, scored.features.liquidation_count
        ));
    }
    if !any {
        output.push_str("- none\n");
    }
    output.push('\n');
}

pub fn explain(wallet: &str, scored: &WalletScore) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {wallet}\n\n"));
    output.push_str(&format!(
        "Score: {} (raw {})\n\n",
        scored.score, scored.raw_total
    ));
    output.push_str("| rule | points |\n|---|---|\n");
    for contribution in &scored.contributions {
        output.push_str(&format!(
            "| {} | {} |\n",
            contribution.rule, contribution.points
        ));
    }

    let features = &scored.features;
    output.push_str("\n## Features\n\n");
    output.push_str(&format!(
        "- deposited: {} USD over {} deposits\n- borrowed: {} USD over {} borrows\n- repaid: {} USD over {} repays\n",
        features.total_deposited_usd,
        features.deposit_count,
        features.total_borrowed_usd,
        features.borrow_count,
        features.total_repaid_usd,
        features.repay_count
    ));
    match features.repay_to_borrow_ratio {
        Some(ratio) => output.push_str(&format!("- repay/borrow ratio: {}\n", ratio.round_dp(4))),
        None => output.push_str("- repay/borrow ratio: n/a (no borrows)\n"),
    }
    output.push_str(&format!(
        "- liquidations: {}\n- activity: {} days ({} to {})\n",
        features.liquidation_count,
        features.activity_span_days.round_dp(2),
        features.first_seen.to_rfc3339(),
        features.last_seen.to_rfc3339()
    ));
    output
}
