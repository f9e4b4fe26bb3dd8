use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::models::{normalize_category, WorkoutEntry, DATE_FORMAT};

/// Line-oriented prompt over any reader/writer pair so the menu can be driven from a
/// terminal or from a buffer in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `label` and reads one line without its line ending. Bytes that are not
    /// UTF-8 become U+FFFD. End of input is reported as `UnexpectedEof`.
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Raw answers to the "add log" questions, in column order.
#[derive(Clone, Debug, Default)]
pub struct RawEntry {
    pub date: String,
    pub category: String,
    pub exercise: String,
    pub weight: String,
    pub reps: String,
    pub distance: String,
    pub time: String,
    pub speed: String,
    pub notes: String,
}

/// Blank date becomes `today`; category is capitalized; everything else is kept verbatim.
pub fn build_entry(raw: RawEntry, today: NaiveDate) -> WorkoutEntry {
    let date = if raw.date.is_empty() {
        today.format(DATE_FORMAT).to_string()
    } else {
        raw.date
    };
    WorkoutEntry {
        date,
        category: normalize_category(&raw.category),
        exercise: raw.exercise,
        weight: raw.weight,
        reps: raw.reps,
        distance: raw.distance,
        time: raw.time,
        speed: raw.speed,
        notes: raw.notes,
    }
}

pub fn prompt_entry<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    today: NaiveDate,
) -> io::Result<WorkoutEntry> {
    writeln!(prompter.out(), "\n--- Add New Workout Log ---")?;
    let raw = RawEntry {
        date: prompter.ask("Date (YYYY-MM-DD) [leave blank for today]: ")?,
        category: prompter.ask("Category (Strength/Cardio/Other): ")?,
        exercise: prompter.ask("Exercise name: ")?,
        weight: prompter.ask("Weight (lbs): ")?,
        reps: prompter.ask("Reps: ")?,
        distance: prompter.ask("Distance (mi): ")?,
        time: prompter.ask("Time (min): ")?,
        speed: prompter.ask("Speed (mph): ")?,
        notes: prompter.ask("Notes: ")?,
    };
    Ok(build_entry(raw, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let entry = build_entry(
            RawEntry {
                category: "strength".into(),
                exercise: "Bench".into(),
                ..Default::default()
            },
            today(),
        );
        assert_eq!(entry.date, "2024-05-10");
        assert_eq!(entry.category, "Strength");
    }

    #[test]
    fn numbers_are_stored_verbatim() {
        let entry = build_entry(
            RawEntry {
                date: "2024-05-01".into(),
                weight: "lots".into(),
                reps: " 5".into(),
                ..Default::default()
            },
            today(),
        );
        assert_eq!(entry.date, "2024-05-01");
        assert_eq!(entry.weight, "lots");
        assert_eq!(entry.reps, " 5");
    }

    #[test]
    fn prompt_reads_nine_answers() {
        let input = "\ncardio\nRun\n\n\n3.1\n28\n6.6\neasy, flat\n";
        let mut prompter = Prompter::new(Cursor::new(input), Vec::new());
        let entry = prompt_entry(&mut prompter, today()).unwrap();
        assert_eq!(entry.date, "2024-05-10");
        assert_eq!(entry.category, "Cardio");
        assert_eq!(entry.distance, "3.1");
        assert_eq!(entry.notes, "easy, flat");
        let shown = String::from_utf8(prompter.into_output()).unwrap();
        assert!(shown.contains("Speed (mph): "));
    }

    #[test]
    fn ask_replaces_invalid_utf8() {
        let mut prompter = Prompter::new(Cursor::new(b"Bench\xff\r\n".to_vec()), Vec::new());
        assert_eq!(prompter.ask("Exercise name: ").unwrap(), "Bench\u{fffd}");
    }

    #[test]
    fn prompt_stops_at_end_of_input() {
        let mut prompter = Prompter::new(Cursor::new("2024-05-01\r\nStrength\n"), Vec::new());
        let err = prompt_entry(&mut prompter, today()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
