use chrono::{Duration, NaiveDate};

use crate::models::{normalize_category, WorkoutEntry};

/// How many days before today the weekly window reaches back. With today included the
/// window spans eight calendar days.
pub const WEEK_LOOKBACK_DAYS: i64 = 7;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeeklySummary {
    pub workouts: usize,
    pub total_weight_lbs: f64,
    pub total_distance_miles: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OneRepMax {
    pub estimate_lbs: f64,
    pub entry: WorkoutEntry,
}

pub fn epley_one_rep_max(weight: f64, reps: i64) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

pub fn in_weekly_window(date: NaiveDate, today: NaiveDate) -> bool {
    let one_week_ago = today - Duration::days(WEEK_LOOKBACK_DAYS);
    date >= one_week_ago && date <= today
}

/// Rows with an unparsable date are left out entirely; blank or malformed weight, reps
/// and distance count as zero without dropping the row.
pub fn weekly_summary<I>(entries: I, today: NaiveDate) -> WeeklySummary
where
    I: IntoIterator<Item = WorkoutEntry>,
{
    let mut summary = WeeklySummary::default();
    for entry in entries {
        let Some(date) = entry.parsed_date() else {
            continue;
        };
        if !in_weekly_window(date, today) {
            continue;
        }
        summary.workouts += 1;
        summary.total_weight_lbs += entry.volume_lbs();
        summary.total_distance_miles += entry.distance_miles().unwrap_or(0.0);
    }
    summary
}

pub fn filter_by_category<I>(entries: I, query: &str) -> Vec<WorkoutEntry>
where
    I: IntoIterator<Item = WorkoutEntry>,
{
    let category = normalize_category(query);
    entries
        .into_iter()
        .filter(|entry| entry.category == category)
        .collect()
}

/// Best Epley estimate across rows for `exercise` (case-insensitive). Rows whose weight
/// or reps fail to parse are skipped; on a tie the earlier row wins.
pub fn best_one_rep_max<I>(entries: I, exercise: &str) -> Option<OneRepMax>
where
    I: IntoIterator<Item = WorkoutEntry>,
{
    let target = exercise.to_lowercase();
    let mut best: Option<OneRepMax> = None;
    for entry in entries {
        if entry.exercise.to_lowercase() != target {
            continue;
        }
        let (Some(weight), Some(reps)) = (entry.weight_lbs(), entry.rep_count()) else {
            continue;
        };
        let estimate = epley_one_rep_max(weight, reps);
        if !estimate.is_finite() {
            continue;
        }
        if best.as_ref().map_or(true, |b| estimate > b.estimate_lbs) {
            best = Some(OneRepMax {
                estimate_lbs: estimate,
                entry,
            });
        }
    }
    best
}
