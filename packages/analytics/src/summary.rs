//! Landing-view statistics: counts, metric averages, and top-N rankings.

use cps_dashboard_analytics_models::{
    RankedSchool, Summary, TOP_INSTRUCTION_LEN, TOP_SAFETY_LEN,
};
use cps_dashboard_school_models::{Metric, SchoolRecord, SchoolType};

/// Computes the landing-view [`Summary`] for a collection.
///
/// Type counts use exact equality, so `ESHS` and untyped schools are in
/// neither bucket.
#[must_use]
pub fn summarize(records: &[SchoolRecord]) -> Summary {
    let count_type = |wanted: SchoolType| {
        records
            .iter()
            .filter(|r| r.school_type == Some(wanted))
            .count()
    };

    let summary = Summary {
        total_count: records.len(),
        elementary_count: count_type(SchoolType::Es),
        high_school_count: count_type(SchoolType::Hs),
        avg_safety: average(records, Metric::Safety),
        avg_instruction: average(records, Metric::Instruction),
        avg_teachers: average(records, Metric::Teachers),
        top_safety: top_by(records, Metric::Safety, TOP_SAFETY_LEN),
        top_instruction: top_by(records, Metric::Instruction, TOP_INSTRUCTION_LEN),
    };

    log::debug!(
        "Summarized {} schools: {} ES, {} HS",
        summary.total_count,
        summary.elementary_count,
        summary.high_school_count
    );

    summary
}

/// Mean of `metric` over records with a usable score, rounded to one
/// decimal place. Returns `0.0` when no record qualifies.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(records: &[SchoolRecord], metric: Metric) -> f64 {
    let (sum, count) = records
        .iter()
        .filter_map(|r| r.score(metric).value())
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));

    if count == 0 {
        return 0.0;
    }
    round_one_decimal(sum as f64 / count as f64)
}

/// The `n` highest-scoring records for `metric`, best first.
///
/// Records without a usable score are skipped. Equal scores keep their
/// relative input order.
#[must_use]
pub fn top_by(records: &[SchoolRecord], metric: Metric, n: usize) -> Vec<RankedSchool> {
    let mut scored: Vec<(u32, &SchoolRecord)> = records
        .iter()
        .filter_map(|r| r.score(metric).value().map(|v| (v, r)))
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));

    scored
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (score, record))| RankedSchool {
            rank: i + 1,
            id: record.id.clone(),
            name: record.display_name(),
            score,
            stars: stars_for(score),
        })
        .collect()
}

/// One star per full 20 points, at most five.
#[must_use]
pub fn stars_for(score: u32) -> u8 {
    u8::try_from((score / 20).min(5)).unwrap_or(5)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
