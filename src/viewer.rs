use std::f32::consts::TAU;

use chrono::NaiveDate;
use eframe::{egui, App, Frame};
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::{
    cumulative_weight_by_day, daily_one_rep_max, exercise_frequency, liftable_exercises,
    workouts_per_week,
};
use crate::models::{WorkoutEntry, FIELDNAMES};

const PALETTE: [Color32; 8] = [
    Color32::from_rgb(94, 129, 172),
    Color32::from_rgb(191, 97, 106),
    Color32::from_rgb(163, 190, 140),
    Color32::from_rgb(235, 203, 139),
    Color32::from_rgb(180, 142, 173),
    Color32::from_rgb(136, 192, 208),
    Color32::from_rgb(208, 135, 112),
    Color32::from_rgb(143, 188, 187),
];

const AXIS: Color32 = Color32::GRAY;

pub fn show_charts(entries: Vec<WorkoutEntry>, window: [f32; 2]) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(window),
        ..Default::default()
    };

    eframe::run_native(
        "Fitness Charts",
        options,
        Box::new(|_cc| Ok(Box::new(ChartsApp::new(entries)))),
    )
    .map_err(|e| anyhow::anyhow!("chart window failed: {e}"))
}

#[derive(PartialEq, Clone, Copy)]
enum ChartView {
    WeightOverTime,
    WeeklyWorkouts,
    ExerciseMix,
    OneRepMaxTrend,
    Logs,
}

impl ChartView {
    const ALL: [ChartView; 5] = [
        ChartView::WeightOverTime,
        ChartView::WeeklyWorkouts,
        ChartView::ExerciseMix,
        ChartView::OneRepMaxTrend,
        ChartView::Logs,
    ];

    fn title(self) -> &'static str {
        match self {
            ChartView::WeightOverTime => "Weight Lifted",
            ChartView::WeeklyWorkouts => "Workouts per Week",
            ChartView::ExerciseMix => "Exercise Mix",
            ChartView::OneRepMaxTrend => "1RM Trend",
            ChartView::Logs => "Logs",
        }
    }

    fn hotkey(self) -> egui::Key {
        match self {
            ChartView::WeightOverTime => egui::Key::Num1,
            ChartView::WeeklyWorkouts => egui::Key::Num2,
            ChartView::ExerciseMix => egui::Key::Num3,
            ChartView::OneRepMaxTrend => egui::Key::Num4,
            ChartView::Logs => egui::Key::Num5,
        }
    }
}

struct ChartsApp {
    entries: Vec<WorkoutEntry>,
    display_mode: ChartView,
    weight_by_day: Vec<(NaiveDate, f64)>,
    weekly_counts: Vec<(String, f64)>,
    exercise_mix: Vec<(String, usize)>,
    exercises: Vec<String>,
    selected_exercise: String,
    one_rep_max_by_day: Vec<(NaiveDate, f64)>,
}

impl ChartsApp {
    fn new(entries: Vec<WorkoutEntry>) -> Self {
        let exercises = liftable_exercises(&entries);
        let selected_exercise = exercises.first().cloned().unwrap_or_default();
        let weekly_counts = workouts_per_week(&entries)
            .into_iter()
            .map(|(week, count)| (format!("{}-W{:02}", week.year(), week.week()), count as f64))
            .collect();
        let mut app = ChartsApp {
            weight_by_day: cumulative_weight_by_day(&entries),
            weekly_counts,
            exercise_mix: exercise_frequency(&entries),
            exercises,
            selected_exercise,
            one_rep_max_by_day: Vec::new(),
            display_mode: ChartView::WeightOverTime,
            entries,
        };
        app.refresh_one_rep_max();
        app
    }

    fn refresh_one_rep_max(&mut self) {
        self.one_rep_max_by_day = daily_one_rep_max(&self.entries, &self.selected_exercise);
    }
}

impl App for ChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        for view in ChartView::ALL {
            if ctx.input(|i| i.key_pressed(view.hotkey())) {
                self.display_mode = view;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for view in ChartView::ALL {
                    if ui
                        .selectable_label(self.display_mode == view, view.title())
                        .clicked()
                    {
                        self.display_mode = view;
                    }
                }
            });
            ui.separator();
            ui.label(RichText::new(self.display_mode.title()).heading().strong());
            ui.add_space(10.0);

            if self.entries.is_empty() {
                ui.label(RichText::new("No logs found yet. Add a workout first.").size(20.0));
                return;
            }

            match self.display_mode {
                ChartView::WeightOverTime => {
                    draw_line_chart(ui, &self.weight_by_day, PALETTE[0], "lbs")
                }
                ChartView::WeeklyWorkouts => draw_bar_chart(ui, &self.weekly_counts),
                ChartView::ExerciseMix => draw_pie_chart(ui, &self.exercise_mix),
                ChartView::OneRepMaxTrend => self.show_one_rep_max(ui),
                ChartView::Logs => show_log_table(ui, &self.entries),
            }
        });
    }
}

impl ChartsApp {
    fn show_one_rep_max(&mut self, ui: &mut Ui) {
        if self.exercises.is_empty() {
            ui.label("No weighted sets with reps logged yet.");
            return;
        }
        let before = self.selected_exercise.clone();
        egui::ComboBox::from_label("Exercise")
            .selected_text(self.selected_exercise.as_str())
            .show_ui(ui, |ui| {
                for name in &self.exercises {
                    ui.selectable_value(&mut self.selected_exercise, name.clone(), name.as_str());
                }
            });
        if before != self.selected_exercise {
            self.refresh_one_rep_max();
        }
        ui.add_space(10.0);
        draw_line_chart(ui, &self.one_rep_max_by_day, PALETTE[1], "lbs");
    }
}

fn chart_area(ui: &mut Ui) -> (Rect, egui::Painter) {
    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let plot = Rect::from_min_max(
        response.rect.min + egui::vec2(70.0, 10.0),
        response.rect.max - egui::vec2(20.0, 40.0),
    );
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], Stroke::new(1.0, AXIS));
    painter.line_segment([plot.left_bottom(), plot.left_top()], Stroke::new(1.0, AXIS));
    (plot, painter)
}

fn y_label(painter: &egui::Painter, plot: Rect, max: f64, unit: &str) {
    let font = FontId::proportional(14.0);
    painter.text(plot.left_top(), Align2::RIGHT_TOP, format!("{max:.0} {unit}"), font.clone(), AXIS);
    painter.text(plot.left_bottom(), Align2::RIGHT_BOTTOM, "0", font, AXIS);
}

fn draw_line_chart(ui: &mut Ui, points: &[(NaiveDate, f64)], color: Color32, unit: &str) {
    if points.is_empty() {
        ui.label("Nothing to plot.");
        return;
    }
    let (plot, painter) = chart_area(ui);
    let first = points[0].0;
    let span = (points[points.len() - 1].0 - first).num_days().max(1) as f32;
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(1.0);
    y_label(&painter, plot, max, unit);

    let to_screen = |date: NaiveDate, value: f64| -> Pos2 {
        let x = (date - first).num_days() as f32 / span;
        let y = (value / max) as f32;
        egui::pos2(
            plot.left() + x * plot.width(),
            plot.bottom() - y * plot.height(),
        )
    };
    let line: Vec<Pos2> = points.iter().map(|(d, v)| to_screen(*d, *v)).collect();
    for pos in &line {
        painter.circle_filled(*pos, 3.0, color);
    }
    painter.add(Shape::line(line, Stroke::new(2.0, color)));

    let font = FontId::proportional(14.0);
    painter.text(
        plot.left_bottom() + egui::vec2(0.0, 6.0),
        Align2::LEFT_TOP,
        first.to_string(),
        font.clone(),
        AXIS,
    );
    painter.text(
        plot.right_bottom() + egui::vec2(0.0, 6.0),
        Align2::RIGHT_TOP,
        points[points.len() - 1].0.to_string(),
        font,
        AXIS,
    );
}

fn draw_bar_chart(ui: &mut Ui, bars: &[(String, f64)]) {
    if bars.is_empty() {
        ui.label("Nothing to plot.");
        return;
    }
    let (plot, painter) = chart_area(ui);
    let max = bars.iter().map(|b| b.1).fold(0.0_f64, f64::max).max(1.0);
    y_label(&painter, plot, max, "workouts");

    let slot = plot.width() / bars.len() as f32;
    let font = FontId::proportional(12.0);
    for (i, (label, value)) in bars.iter().enumerate() {
        let left = plot.left() + i as f32 * slot + slot * 0.15;
        let height = (*value / max) as f32 * plot.height();
        let bar = Rect::from_min_max(
            egui::pos2(left, plot.bottom() - height),
            egui::pos2(left + slot * 0.7, plot.bottom()),
        );
        painter.rect_filled(bar, 0.0, PALETTE[0]);
        painter.text(
            egui::pos2(bar.center().x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            format!("{value}"),
            font.clone(),
            AXIS,
        );
        painter.text(
            egui::pos2(bar.center().x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            label,
            font.clone(),
            AXIS,
        );
    }
}

fn draw_pie_chart(ui: &mut Ui, slices: &[(String, usize)]) {
    let total: usize = slices.iter().map(|s| s.1).sum();
    if total == 0 {
        ui.label("Nothing to plot.");
        return;
    }
    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let radius = response.rect.height().min(response.rect.width() * 0.6) * 0.4;
    let center = egui::pos2(
        response.rect.left() + radius + 40.0,
        response.rect.center().y,
    );

    let mut start = -TAU / 4.0;
    for (i, (name, count)) in slices.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let sweep = *count as f32 / total as f32 * TAU;
        let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
        let point = |angle: f32| center + radius * egui::vec2(angle.cos(), angle.sin());
        // Fan of thin triangles so slices wider than half the circle stay convex.
        for step in 0..steps {
            let a0 = start + sweep * step as f32 / steps as f32;
            let a1 = start + sweep * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point(a0), point(a1)],
                color,
                Stroke::NONE,
            ));
        }

        let legend = egui::pos2(center.x + radius + 40.0, response.rect.top() + 20.0 + i as f32 * 24.0);
        painter.rect_filled(Rect::from_min_size(legend, egui::vec2(16.0, 16.0)), 0.0, color);
        let share = *count as f64 / total as f64 * 100.0;
        painter.text(
            legend + egui::vec2(24.0, 0.0),
            Align2::LEFT_TOP,
            format!("{name}: {count} ({share:.1}%)"),
            FontId::proportional(16.0),
            ui.visuals().text_color(),
        );
        start += sweep;
    }
}

fn show_log_table(ui: &mut Ui, entries: &[WorkoutEntry]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), FIELDNAMES.len() - 1)
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for name in FIELDNAMES {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, entries.len(), |mut row| {
                let entry = &entries[row.index()];
                let cells = [
                    &entry.date,
                    &entry.category,
                    &entry.exercise,
                    &entry.weight,
                    &entry.reps,
                    &entry.distance,
                    &entry.time,
                    &entry.speed,
                    &entry.notes,
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}
