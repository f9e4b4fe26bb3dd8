use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, IsoWeek, NaiveDate};

use crate::models::{title_case, WorkoutEntry};
use crate::queries::epley_one_rep_max;

/// Running total of weight x reps, one point per logged day in date order.
pub fn cumulative_weight_by_day(entries: &[WorkoutEntry]) -> Vec<(NaiveDate, f64)> {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        if let Some(date) = entry.parsed_date() {
            *per_day.entry(date).or_insert(0.0) += entry.volume_lbs();
        }
    }
    let mut running = 0.0;
    per_day
        .into_iter()
        .map(|(date, volume)| {
            running += volume;
            (date, running)
        })
        .collect()
}

pub fn workouts_per_week(entries: &[WorkoutEntry]) -> Vec<(IsoWeek, usize)> {
    let mut per_week: BTreeMap<(i32, u32), (IsoWeek, usize)> = BTreeMap::new();
    for date in entries.iter().filter_map(WorkoutEntry::parsed_date) {
        let week = date.iso_week();
        per_week
            .entry((week.year(), week.week()))
            .or_insert((week, 0))
            .1 += 1;
    }
    per_week.into_values().collect()
}

/// Exercise name (title-cased, case folded) to count, most frequent first.
pub fn exercise_frequency(entries: &[WorkoutEntry]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let name = entry.exercise.trim();
        if name.is_empty() {
            continue;
        }
        *counts.entry(title_case(name)).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Best Epley estimate per day for one exercise.
pub fn daily_one_rep_max(entries: &[WorkoutEntry], exercise: &str) -> Vec<(NaiveDate, f64)> {
    let target = exercise.trim().to_lowercase();
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        if entry.exercise.trim().to_lowercase() != target {
            continue;
        }
        let (Some(date), Some(weight), Some(reps)) =
            (entry.parsed_date(), entry.weight_lbs(), entry.rep_count())
        else {
            continue;
        };
        let estimate = epley_one_rep_max(weight, reps);
        if !estimate.is_finite() {
            continue;
        }
        per_day
            .entry(date)
            .and_modify(|best| {
                if estimate > *best {
                    *best = estimate;
                }
            })
            .or_insert(estimate);
    }
    per_day.into_iter().collect()
}

/// Exercises that have at least one row with a usable weight and rep count.
pub fn liftable_exercises(entries: &[WorkoutEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter(|e| e.weight_lbs().is_some() && e.rep_count().is_some())
        .map(|e| title_case(e.exercise.trim()))
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, exercise: &str, weight: &str, reps: &str) -> WorkoutEntry {
        WorkoutEntry {
            date: date.into(),
            category: "Strength".into(),
            exercise: exercise.into(),
            weight: weight.into(),
            reps: reps.into(),
            ..Default::default()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn cumulative_weight_sorts_days_and_accumulates() {
        let entries = vec![
            row("2024-05-03", "Squat", "200", "3"),
            row("2024-05-01", "Bench", "100", "5"),
            row("2024-05-01", "Bench", "100", "5"),
            row("garbage", "Bench", "100", "5"),
            row("2024-05-02", "Run", "", ""),
        ];
        assert_eq!(
            cumulative_weight_by_day(&entries),
            vec![(day(1), 1000.0), (day(2), 1000.0), (day(3), 1600.0)]
        );
    }

    #[test]
    fn workouts_grouped_by_iso_week() {
        // 2024-05-05 is a Sunday, 2024-05-06 a Monday.
        let entries = vec![
            row("2024-05-05", "Bench", "", ""),
            row("2024-05-06", "Bench", "", ""),
            row("2024-05-07", "Bench", "", ""),
            row("nope", "Bench", "", ""),
        ];
        let weeks = workouts_per_week(&entries);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].0.week(), 18);
        assert_eq!(weeks[0].1, 1);
        assert_eq!(weeks[1].0.week(), 19);
        assert_eq!(weeks[1].1, 2);
    }

    #[test]
    fn exercise_frequency_folds_case() {
        let entries = vec![
            row("2024-05-01", "bench", "", ""),
            row("2024-05-02", "Bench", "", ""),
            row("2024-05-02", "Squat", "", ""),
            row("2024-05-02", "", "", ""),
        ];
        assert_eq!(
            exercise_frequency(&entries),
            vec![("Bench".to_string(), 2), ("Squat".to_string(), 1)]
        );
    }

    #[test]
    fn daily_one_rep_max_keeps_best_per_day() {
        let entries = vec![
            row("2024-05-01", "Bench", "100", "5"),
            row("2024-05-01", "bench", "90", "10"),
            row("2024-05-02", "Bench", "bad", "10"),
            row("2024-05-03", "Bench", "95", "3"),
            row("2024-05-03", "Squat", "300", "3"),
        ];
        let points = daily_one_rep_max(&entries, "Bench");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, day(1));
        assert_eq!(format!("{:.1}", points[0].1), "120.0");
        assert_eq!(points[1].0, day(3));
    }

    #[test]
    fn daily_one_rep_max_skips_nan_and_matches_padded_names() {
        let entries = vec![
            row("2024-05-01", "Bench", "nan", "5"),
            row("2024-05-01", " Bench ", "90", "10"),
            row("2024-05-02", "Bench", "100", "5"),
        ];
        let exercises = liftable_exercises(&entries);
        assert_eq!(exercises, vec!["Bench"]);

        let points = daily_one_rep_max(&entries, &exercises[0]);
        assert_eq!(points.len(), 2);
        assert_eq!(format!("{:.1}", points[0].1), "120.0");
        assert_eq!(format!("{:.1}", points[1].1), "116.7");
    }

    #[test]
    fn liftable_exercises_are_unique_and_sorted() {
        let entries = vec![
            row("2024-05-01", "squat", "200", "3"),
            row("2024-05-01", "Bench", "100", "5"),
            row("2024-05-02", "bench", "100", "5"),
            row("2024-05-02", "Run", "", ""),
        ];
        assert_eq!(liftable_exercises(&entries), vec!["Bench", "Squat"]);
    }
}
