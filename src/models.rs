use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const FIELDNAMES: [&str; 9] = [
    "Date",
    "Category",
    "Exercise",
    "Weight (lbs)",
    "Reps",
    "Distance (mi)",
    "Time (min)",
    "Speed (mph)",
    "Notes",
];

/// One logged exercise occurrence. Every field is kept as the text the user typed;
/// numeric parsing happens on the read side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutEntry {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Weight (lbs)")]
    pub weight: String,
    #[serde(rename = "Reps")]
    pub reps: String,
    #[serde(rename = "Distance (mi)")]
    pub distance: String,
    #[serde(rename = "Time (min)")]
    pub time: String,
    #[serde(rename = "Speed (mph)")]
    pub speed: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl WorkoutEntry {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn weight_lbs(&self) -> Option<f64> {
        parse_optional_number(&self.weight)
    }

    pub fn rep_count(&self) -> Option<i64> {
        parse_optional_integer(&self.reps)
    }

    pub fn distance_miles(&self) -> Option<f64> {
        parse_optional_number(&self.distance)
    }

    /// weight x reps, with a blank or unparsable side counting as zero.
    pub fn volume_lbs(&self) -> f64 {
        let weight = self.weight_lbs().unwrap_or(0.0);
        let reps = self.rep_count().unwrap_or(0);
        weight * reps as f64
    }
}

impl fmt::Display for WorkoutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.date, self.category, self.exercise)?;
        let details = [
            (&self.weight, "lbs"),
            (&self.reps, "reps"),
            (&self.distance, "mi"),
            (&self.time, "min"),
            (&self.speed, "mph"),
        ];
        for (value, unit) in details {
            if !value.trim().is_empty() {
                write!(f, " | {} {}", value, unit)?;
            }
        }
        if !self.notes.is_empty() {
            write!(f, " | {}", self.notes)?;
        }
        Ok(())
    }
}

/// Parses a decimal field. Blank, malformed and non-finite text ("nan", "inf") all yield
/// `None`; each call site decides whether that means zero or skipping the row.
pub fn parse_optional_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_optional_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>().ok()
}

/// "strength" -> "Strength", "CARDIO" -> "Cardio".
pub fn normalize_category(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// "bench press" -> "Bench Press"
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
