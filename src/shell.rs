use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::entry_builder::{prompt_entry, Prompter};
use crate::error::StoreError;
use crate::models::{normalize_category, title_case, WorkoutEntry};
use crate::queries::{best_one_rep_max, filter_by_category, weekly_summary};
use crate::store::{skip_unreadable, RecordStore};

const NO_LOGS_YET: &str = "No logs found yet. Add a workout first.";

pub type ChartLauncher = Box<dyn FnMut(Vec<WorkoutEntry>) -> anyhow::Result<()>>;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MenuChoice {
    AddLog,
    ViewLogs,
    WeeklySummary,
    FilterByCategory,
    OneRepMax,
    Charts,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AddLog),
            "2" => Some(MenuChoice::ViewLogs),
            "3" => Some(MenuChoice::WeeklySummary),
            "4" => Some(MenuChoice::FilterByCategory),
            "5" => Some(MenuChoice::OneRepMax),
            "6" => Some(MenuChoice::Charts),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Interactive menu loop. Only terminal I/O errors end it early; store problems are
/// printed and the menu comes back.
pub struct Shell<R, W> {
    store: RecordStore,
    prompter: Prompter<R, W>,
    today: fn() -> NaiveDate,
    launch_charts: ChartLauncher,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: RecordStore, input: R, output: W, launch_charts: ChartLauncher) -> Self {
        Shell {
            store,
            prompter: Prompter::new(input, output),
            today: local_today,
            launch_charts,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Runs until "Exit" is chosen or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        match self.run_menu() {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.prompter.out())?;
                self.say_goodbye()
            }
            other => other,
        }
    }

    fn run_menu(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let choice = self.prompter.ask("Choose an option: ")?;
            match MenuChoice::parse(&choice) {
                Some(MenuChoice::AddLog) => self.add_log()?,
                Some(MenuChoice::ViewLogs) => self.view_logs()?,
                Some(MenuChoice::WeeklySummary) => self.weekly_summary()?,
                Some(MenuChoice::FilterByCategory) => self.filter_by_category()?,
                Some(MenuChoice::OneRepMax) => self.one_rep_max()?,
                Some(MenuChoice::Charts) => self.charts()?,
                Some(MenuChoice::Exit) => return self.say_goodbye(),
                None => writeln!(self.prompter.out(), "Invalid choice. Try again.")?,
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let out = self.prompter.out();
        writeln!(out, "\n======= Fitness Tracker =======")?;
        writeln!(out, "1. Add new workout log")?;
        writeln!(out, "2. View all logs")?;
        writeln!(out, "3. View weekly summary")?;
        writeln!(out, "4. Filter logs by category")?;
        writeln!(out, "5. Calculate 1-Rep Max")?;
        writeln!(out, "6. View charts")?;
        writeln!(out, "7. Exit")
    }

    fn say_goodbye(&mut self) -> io::Result<()> {
        writeln!(self.prompter.out(), "👋 Goodbye!")
    }

    /// Opens the log for a query. `None` means a message was already printed.
    fn scan(&mut self) -> io::Result<Option<impl Iterator<Item = WorkoutEntry>>> {
        self.scan_or("No logs found yet.")
    }

    fn scan_or(
        &mut self,
        not_found: &str,
    ) -> io::Result<Option<impl Iterator<Item = WorkoutEntry>>> {
        match self.store.read_all() {
            Ok(entries) => Ok(Some(skip_unreadable(entries))),
            Err(StoreError::NotFound(_)) => {
                writeln!(self.prompter.out(), "{not_found}")?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "failed to read workout log");
                writeln!(self.prompter.out(), "Could not read logs: {e}")?;
                Ok(None)
            }
        }
    }

    fn add_log(&mut self) -> io::Result<()> {
        let entry = prompt_entry(&mut self.prompter, (self.today)())?;
        match self.store.append(&entry) {
            Ok(()) => writeln!(self.prompter.out(), "✅ Log saved!"),
            Err(e) => {
                warn!(error = %e, "failed to append workout entry");
                writeln!(self.prompter.out(), "Could not save log: {e}")
            }
        }
    }

    fn view_logs(&mut self) -> io::Result<()> {
        writeln!(self.prompter.out(), "\n--- Workout Logs ---")?;
        let Some(entries) = self.scan_or(NO_LOGS_YET)? else {
            return Ok(());
        };
        let mut shown = 0;
        for entry in entries {
            writeln!(self.prompter.out(), "{entry}")?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(self.prompter.out(), "{NO_LOGS_YET}")?;
        }
        Ok(())
    }

    fn weekly_summary(&mut self) -> io::Result<()> {
        writeln!(self.prompter.out(), "\n--- Weekly Summary ---")?;
        let Some(entries) = self.scan()? else {
            return Ok(());
        };
        let summary = weekly_summary(entries, (self.today)());
        let out = self.prompter.out();
        writeln!(out, "📅 Workouts in last 7 days: {}", summary.workouts)?;
        writeln!(out, "🏋️ Total weight lifted: {:?} lbs", summary.total_weight_lbs)?;
        writeln!(out, "🏃 Total distance run: {:?} miles", summary.total_distance_miles)
    }

    fn filter_by_category(&mut self) -> io::Result<()> {
        let query = self
            .prompter
            .ask("\nEnter category to filter (Strength/Cardio/Other): ")?;
        writeln!(
            self.prompter.out(),
            "\n--- Logs in Category: {} ---",
            normalize_category(&query)
        )?;
        let Some(entries) = self.scan()? else {
            return Ok(());
        };
        let matches = filter_by_category(entries, &query);
        let out = self.prompter.out();
        for entry in &matches {
            writeln!(out, "{entry}")?;
        }
        if matches.is_empty() {
            writeln!(out, "No logs found in that category.")?;
        }
        Ok(())
    }

    fn one_rep_max(&mut self) -> io::Result<()> {
        writeln!(self.prompter.out(), "\n--- 1-Rep Max Estimator ---")?;
        let exercise = self.prompter.ask("Exercise name: ")?;
        let Some(entries) = self.scan()? else {
            return Ok(());
        };
        let out = self.prompter.out();
        match best_one_rep_max(entries, &exercise) {
            Some(best) => {
                writeln!(
                    out,
                    "💪 Best estimated 1-Rep Max for '{}': {:.1} lbs",
                    title_case(&exercise),
                    best.estimate_lbs
                )?;
                writeln!(
                    out,
                    "  → Based on: {} lbs x {} reps on {}",
                    best.entry.weight, best.entry.reps, best.entry.date
                )
            }
            None => writeln!(out, "No valid logs found for that exercise."),
        }
    }

    fn charts(&mut self) -> io::Result<()> {
        let loaded = self
            .store
            .read_all()
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>());
        let entries = match loaded {
            Ok(entries) => entries,
            Err(StoreError::NotFound(_)) => {
                return writeln!(self.prompter.out(), "No logs found yet.");
            }
            Err(e) => {
                warn!(error = %e, "failed to load logs for charts");
                return writeln!(self.prompter.out(), "Could not load logs for charts: {e}");
            }
        };
        writeln!(self.prompter.out(), "Opening charts, close the window to return.")?;
        if let Err(e) = (self.launch_charts)(entries) {
            warn!(error = %e, "chart window failed");
            writeln!(self.prompter.out(), "Could not show charts: {e}")?;
        }
        Ok(())
    }
}
