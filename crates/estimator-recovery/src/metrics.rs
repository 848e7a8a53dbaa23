//! Derived metrics calculator
//!
//! Phase subtotals and summary totals are always recomputed from the tasks;
//! whatever the model claimed is discarded. `recommended_team_size` is the
//! one summary value taken from the model and is never changed here.
//!
//! Hours are summed as integer hundredths, so totals are exact and do not
//! depend on task or phase order.

use estimator_model::{EstimationDocument, HoursRange, Summary};

/// Working hours per person per week.
pub const STANDARD_WEEKLY_HOURS: f64 = 40.0;

const HUNDREDTHS_PER_HOUR: f64 = 100.0;

/// Round `hours` to the hundredth the calculator sums in.
#[must_use]
pub fn quantize_hours(hours: f64) -> f64 {
    from_hundredths(to_hundredths(hours))
}

fn to_hundredths(hours: f64) -> i64 {
    // `as` saturates; NaN maps to 0.
    (hours * HUNDREDTHS_PER_HOUR).round() as i64
}

fn from_hundredths(hundredths: i64) -> f64 {
    hundredths as f64 / HUNDREDTHS_PER_HOUR
}

/// Recompute subtotals and summary, returning the finalized document.
#[must_use]
pub fn apply_metrics(mut document: EstimationDocument) -> EstimationDocument {
    recompute(&mut document);
    document
}

/// In-place form of [`apply_metrics`]. Idempotent.
pub fn recompute(document: &mut EstimationDocument) {
    let (mut total_min, mut total_max) = (0i64, 0i64);
    for phase in &mut document.phases {
        let (min, max) = phase.tasks.iter().fold((0i64, 0i64), |(min, max), task| {
            (
                min.saturating_add(to_hundredths(task.min_hours)),
                max.saturating_add(to_hundredths(task.max_hours)),
            )
        });
        phase.subtotal = HoursRange {
            min_hours: from_hundredths(min),
            max_hours: from_hundredths(max),
        };
        total_min = total_min.saturating_add(min);
        total_max = total_max.saturating_add(max);
    }

    let total_max_hours = from_hundredths(total_max);
    let team_size = document.summary.recommended_team_size;

    document.summary = Summary {
        total_min_hours: from_hundredths(total_min),
        total_max_hours,
        estimated_duration_weeks: duration_weeks(total_max_hours, team_size),
        recommended_team_size: team_size,
        total_tasks: document.task_count(),
        total_phases: document.phases.len(),
    };
}

/// `ceil(hours / (team × 40))`, with a team of 0 treated as 1.
#[must_use]
pub fn duration_weeks(total_max_hours: f64, team_size: u32) -> u64 {
    let capacity = f64::from(team_size.max(1)) * STANDARD_WEEKLY_HOURS;
    let weeks = (total_max_hours / capacity).ceil();
    if weeks.is_finite() && weeks > 0.0 {
        weeks as u64
    } else {
        0
    }
}
