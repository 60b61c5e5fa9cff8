use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};
use eframe::{App, Frame, CreationContext, egui};
use egui::{Ui, ScrollArea, RichText, Color32, Layout, Align};
use egui_extras::{Column, DatePickerButton, TableBuilder};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use workout_tracker::calendar::{MonthView, WEEKDAYS};
use workout_tracker::entry::{ExerciseForm, REPS_RANGE, SETS_RANGE, WEIGHT_RANGE, WEIGHT_STEP};
use workout_tracker::queries::{
    exercise_sessions, history, previous_session, progress_series, progress_summary,
    recommend_next_program, HistoryFilter, ProgressPoint,
};
use workout_tracker::routines;
use workout_tracker::{Config, DualStore, Program, RecordStore, Synced, SyncWarning, WorkoutRecord};

const MONTHS: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь",
    "Июль", "Август", "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
];

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("workout_tracker=info")),
        )
        .init();

    let config = Config::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Трекер тренировок",
        options,
        Box::new(move |cc| Ok(Box::new(WorkoutApp::new(cc, &config)?))),
    )
}

#[derive(PartialEq, Clone, Copy)]
enum DisplayMode {
    Calendar,
    Entry,
    History,
    Progress,
}

enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

struct WorkoutApp {
    store: DualStore,
    records: Vec<WorkoutRecord>,
    display_mode: DisplayMode,
    notices: Vec<Notice>,
    calendar_year: i32,
    calendar_month: u32,
    entry_date: NaiveDate,
    entry_program: Program,
    entry_exercise: usize,
    forms: HashMap<(Program, &'static str), ExerciseForm>,
    history_filter: HistoryFilter,
    progress_exercise: &'static str,
}

impl WorkoutApp {
    fn new(cc: &CreationContext, config: &Config) -> workout_tracker::Result<Self> {
        let store = DualStore::new(config)?;
        let today = Local::now().date_naive();

        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(18.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(28.0, egui::FontFamily::Proportional),
        );
        cc.egui_ctx.set_style(style);

        let mut app = WorkoutApp {
            store,
            records: Vec::new(),
            display_mode: DisplayMode::Calendar,
            notices: Vec::new(),
            calendar_year: today.year(),
            calendar_month: today.month(),
            entry_date: today,
            entry_program: Program::A,
            entry_exercise: 0,
            forms: HashMap::new(),
            history_filter: HistoryFilter::default(),
            progress_exercise: routines::exercises(Program::A)[0],
        };
        app.reload();
        app.entry_program = recommend_next_program(&app.records);
        info!(rows = app.records.len(), remote = app.store.is_remote(), "workout tracker started");
        Ok(app)
    }

    fn reload(&mut self) {
        match self.store.load() {
            Ok(Synced { value, warnings }) => {
                self.records = value;
                self.push_warnings(warnings);
            }
            Err(e) => {
                error!("failed to load workout data: {e}");
                self.notices.push(Notice::Error(format!("Ошибка при загрузке данных: {e}")));
            }
        }
        self.forms.clear();
    }

    fn push_warnings(&mut self, warnings: Vec<SyncWarning>) {
        self.notices
            .extend(warnings.into_iter().map(|w| Notice::Warning(w.to_string())));
    }

    fn save_exercise(&mut self, key: (Program, &'static str)) {
        let Some(form) = self.forms.get_mut(&key) else {
            return;
        };
        // Sets already stored are unticked, so a retry only sends the rest.
        match form.save(&self.store, self.entry_date) {
            Ok(Some(Synced { value, warnings })) => {
                self.records = value;
                self.forms.clear();
                self.notices.push(Notice::Info(format!("Данные для {} сохранены!", key.1)));
                self.push_warnings(warnings);
            }
            Ok(None) => self.notices.push(Notice::Warning(
                "Нет выполненных подходов для сохранения!".to_string(),
            )),
            Err(e) => {
                error!("failed to save {}: {e}", key.1);
                self.notices.push(Notice::Error(format!("Ошибка при сохранении данных: {e}")));
            }
        }
    }
}

impl App for WorkoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("modes").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Режим");
            for (mode, label) in [
                (DisplayMode::Calendar, "Календарь"),
                (DisplayMode::Entry, "Запись тренировки"),
                (DisplayMode::History, "История тренировок"),
                (DisplayMode::Progress, "Анализ прогресса"),
            ] {
                if ui.selectable_label(self.display_mode == mode, label).clicked() {
                    self.display_mode = mode;
                }
            }
            ui.separator();
            if ui.button("Обновить данные").clicked() {
                self.reload();
            }
            ui.add_space(10.0);
            let storage = if self.store.is_remote() {
                "Данные сохраняются в GitHub Gist и локально."
            } else {
                "Gist не настроен: данные сохраняются только локально."
            };
            ui.label(RichText::new(storage).small());
            let path = self.store.data_file().display().to_string();
            ui.label(RichText::new(path).small().weak());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                self.show_notices(ui);
                ScrollArea::vertical().show(ui, |ui| match self.display_mode {
                    DisplayMode::Calendar => self.show_calendar_display(ui),
                    DisplayMode::Entry => self.show_entry_display(ui),
                    DisplayMode::History => self.show_history_display(ui),
                    DisplayMode::Progress => self.show_progress_display(ui),
                });
            });
        });
    }
}

impl WorkoutApp {
    fn show_notices(&mut self, ui: &mut Ui) {
        if self.notices.is_empty() {
            return;
        }
        for notice in &self.notices {
            match notice {
                Notice::Info(text) => ui.colored_label(Color32::from_rgb(60, 160, 60), text),
                Notice::Warning(text) => ui.colored_label(Color32::from_rgb(200, 150, 0), text),
                Notice::Error(text) => ui.colored_label(Color32::from_rgb(200, 40, 40), text),
            };
        }
        if ui.small_button("Скрыть").clicked() {
            self.notices.clear();
        }
        ui.separator();
    }

    fn show_calendar_display(&mut self, ui: &mut Ui) {
        ui.heading("Календарь тренировок");
        ui.add_space(10.0);

        let this_year = Local::now().year();
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Месяц")
                .selected_text(MONTHS[self.calendar_month as usize - 1])
                .show_ui(ui, |ui| {
                    for (i, name) in MONTHS.iter().enumerate() {
                        ui.selectable_value(&mut self.calendar_month, i as u32 + 1, *name);
                    }
                });
            egui::ComboBox::from_label("Год")
                .selected_text(self.calendar_year.to_string())
                .show_ui(ui, |ui| {
                    for year in this_year - 1..=this_year + 1 {
                        ui.selectable_value(&mut self.calendar_year, year, year.to_string());
                    }
                });
        });
        ui.add_space(10.0);

        let Some(view) =
            MonthView::build(&self.records, self.calendar_year, self.calendar_month)
        else {
            return;
        };
        egui::Grid::new("calendar")
            .min_col_width(70.0)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                for day in WEEKDAYS {
                    ui.strong(day);
                }
                ui.end_row();
                for week in &view.weeks {
                    for day in week {
                        match (day, day.and_then(|d| view.program_on(d))) {
                            (Some(d), Some(program)) => {
                                ui.label(
                                    RichText::new(format!("{d}\n{}", program.letter()))
                                        .background_color(program_color(program))
                                        .color(Color32::BLACK)
                                        .strong(),
                                );
                            }
                            (Some(d), None) => {
                                ui.label(d.to_string());
                            }
                            (None, _) => {
                                ui.label("");
                            }
                        }
                    }
                    ui.end_row();
                }
            });

        ui.add_space(20.0);
        ui.label(RichText::new("Легенда").strong());
        ui.horizontal(|ui| {
            for program in routines::programs() {
                ui.label(
                    RichText::new(program.label())
                        .background_color(program_color(program))
                        .color(Color32::BLACK),
                );
            }
        });

        ui.add_space(20.0);
        ui.label(
            RichText::new(format!(
                "Рекомендуемая следующая тренировка: {}",
                recommend_next_program(&self.records)
            ))
            .size(22.0)
            .strong(),
        );
    }

    fn show_entry_display(&mut self, ui: &mut Ui) {
        ui.heading("Запись новой тренировки");
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.label("Дата тренировки");
            ui.add(DatePickerButton::new(&mut self.entry_date));
            ui.add_space(20.0);
            egui::ComboBox::from_label("Программа тренировки")
                .selected_text(self.entry_program.label())
                .show_ui(ui, |ui| {
                    for program in routines::programs() {
                        if ui
                            .selectable_value(&mut self.entry_program, program, program.label())
                            .clicked()
                        {
                            self.entry_exercise = 0;
                        }
                    }
                });
        });
        ui.add_space(10.0);
        ui.label(
            RichText::new(format!("Упражнения для {}", self.entry_program))
                .size(22.0)
                .strong(),
        );

        let program = self.entry_program;
        let exercises = routines::exercises(program);
        ui.horizontal_wrapped(|ui| {
            for (i, exercise) in exercises.iter().enumerate() {
                if ui.selectable_label(self.entry_exercise == i, *exercise).clicked() {
                    self.entry_exercise = i;
                }
            }
        });
        ui.separator();

        let Some(&exercise) = exercises.get(self.entry_exercise) else {
            return;
        };
        let key = (program, exercise);
        let records = &self.records;
        let form = self.forms.entry(key).or_insert_with(|| {
            ExerciseForm::seeded(
                program,
                exercise,
                previous_session(records, program, exercise),
            )
        });

        let mut count = form.sets.len() as u32;
        ui.horizontal(|ui| {
            ui.label("Количество подходов");
            ui.add(egui::DragValue::new(&mut count).range(SETS_RANGE));
        });
        if count as usize != form.sets.len() {
            form.resize(count);
        }

        for set in form.sets.iter_mut() {
            ui.add_space(8.0);
            ui.label(RichText::new(format!("Подход {}", set.set_number)).strong());
            ui.checkbox(&mut set.completed, "Подход выполнен");
            if set.completed {
                ui.horizontal(|ui| {
                    ui.label("Повторения");
                    ui.add(egui::DragValue::new(&mut set.reps).range(REPS_RANGE));
                    ui.add_space(20.0);
                    ui.label("Вес (кг)");
                    ui.add(
                        egui::DragValue::new(&mut set.weight)
                            .range(WEIGHT_RANGE)
                            .speed(WEIGHT_STEP),
                    );
                });
            } else {
                ui.label(
                    RichText::new(format!(
                        "Предыдущий результат: {} повторений × {} кг",
                        set.reps, set.weight
                    ))
                    .weak(),
                );
            }
        }

        ui.add_space(12.0);
        if ui.button(RichText::new(format!("Сохранить {exercise}")).strong()).clicked() {
            self.save_exercise(key);
        }
    }

    fn show_history_display(&mut self, ui: &mut Ui) {
        ui.heading("История тренировок");
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let program_text = self.history_filter.program.map_or("Все", |p| p.label());
            egui::ComboBox::from_label("Фильтр по тренировке")
                .selected_text(program_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.history_filter.program, None, "Все");
                    for program in routines::programs() {
                        ui.selectable_value(
                            &mut self.history_filter.program,
                            Some(program),
                            program.label(),
                        );
                    }
                });

            let exercise_text = self
                .history_filter
                .exercise
                .clone()
                .unwrap_or_else(|| "Все".to_string());
            egui::ComboBox::from_label("Фильтр по упражнению")
                .selected_text(exercise_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.history_filter.exercise, None, "Все");
                    for exercise in routines::all_exercises() {
                        ui.selectable_value(
                            &mut self.history_filter.exercise,
                            Some(exercise.to_string()),
                            exercise,
                        );
                    }
                });
        });
        ui.add_space(10.0);

        let sessions = history(&self.records, &self.history_filter);
        if sessions.is_empty() {
            ui.label(
                "Нет данных для отображения. \
                 Записывайте свои тренировки в режиме 'Запись тренировки'.",
            );
            return;
        }

        for session in &sessions {
            egui::CollapsingHeader::new(format!("{} - {}", session.date, session.program))
                .id_salt((session.date, session.program))
                .show(ui, |ui| {
                    for (exercise, sets) in &session.exercises {
                        ui.label(RichText::new(exercise).strong());
                        sets_table(ui, (session.date, session.program, exercise), sets);
                        ui.add_space(6.0);
                    }
                });
        }
    }

    fn show_progress_display(&mut self, ui: &mut Ui) {
        ui.heading("Анализ прогресса");
        ui.add_space(10.0);

        if self.records.is_empty() {
            ui.label("Нет данных для анализа. Начните записывать свои тренировки.");
            return;
        }

        egui::ComboBox::from_label("Упражнение для анализа")
            .selected_text(self.progress_exercise)
            .show_ui(ui, |ui| {
                for exercise in routines::all_exercises() {
                    ui.selectable_value(&mut self.progress_exercise, exercise, exercise);
                }
            });
        ui.add_space(10.0);

        let exercise = self.progress_exercise;
        let series = progress_series(&self.records, exercise);
        let Some(summary) = progress_summary(&series) else {
            ui.label(format!("Нет данных для упражнения '{exercise}'"));
            return;
        };

        ui.label(
            RichText::new(format!("Прогресс по весу - {exercise}"))
                .size(22.0)
                .strong(),
        );
        let weight_color = Color32::from_rgb(70, 130, 220);
        line_chart(ui, &series, |p| p.max_weight, weight_color);
        ui.add_space(10.0);
        ui.label(
            RichText::new(format!("Прогресс по повторениям - {exercise}"))
                .size(22.0)
                .strong(),
        );
        let reps_color = Color32::from_rgb(220, 110, 60);
        line_chart(ui, &series, |p| p.max_reps as f64, reps_color);

        ui.add_space(10.0);
        ui.label(RichText::new("Статистика").size(22.0).strong());
        ui.horizontal(|ui| {
            metric(ui, "Максимальный вес", format!("{} кг", summary.max_weight));
            metric(ui, "Максимальные повторения", summary.max_reps.to_string());
            metric(ui, "Прогресс по весу", summary.change.to_string());
        });

        ui.add_space(10.0);
        ui.label(RichText::new("История тренировок").size(22.0).strong());
        for (date, rows) in exercise_sessions(&self.records, exercise) {
            egui::CollapsingHeader::new(format!("Тренировка {date}"))
                .id_salt(("progress", date))
                .show(ui, |ui| sets_table(ui, ("progress", date), &rows));
        }
    }
}

fn program_color(program: Program) -> Color32 {
    match program {
        Program::A => Color32::from_rgb(0xff, 0x99, 0x99),
        Program::B => Color32::from_rgb(0x99, 0xff, 0x99),
        Program::C => Color32::from_rgb(0x99, 0x99, 0xff),
        Program::D => Color32::from_rgb(0xff, 0xff, 0x99),
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
    ui.add_space(30.0);
}

fn sets_table(ui: &mut Ui, id: impl std::hash::Hash, rows: &[WorkoutRecord]) {
    ui.push_id(id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .header(24.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Подход");
                });
                header.col(|ui| {
                    ui.strong("Повторения");
                });
                header.col(|ui| {
                    ui.strong("Вес");
                });
            })
            .body(|mut body| {
                for r in rows {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(r.set_number.to_string());
                        });
                        row.col(|ui| {
                            ui.label(r.reps.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{}", r.weight));
                        });
                    });
                }
            });
    });
}

fn line_chart(
    ui: &mut Ui,
    series: &[ProgressPoint],
    value: impl Fn(&ProgressPoint) -> f64,
    color: Color32,
) {
    let size = egui::vec2(ui.available_width().min(900.0), 180.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect.shrink(24.0);

    let values: Vec<f64> = series.iter().map(&value).collect();
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let step = if values.len() > 1 { rect.width() / (values.len() - 1) as f32 } else { 0.0 };

    let points: Vec<egui::Pos2> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = rect.left() + step * i as f32;
            let y = rect.bottom() - ((v - lo) / span) as f32 * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    let stroke = egui::Stroke::new(2.0, color);
    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], stroke);
    }
    let text_color = ui.visuals().text_color();
    for ((point, v), p) in points.iter().zip(&values).zip(series) {
        painter.circle_filled(*point, 4.0, color);
        painter.text(
            *point - egui::vec2(0.0, 10.0),
            egui::Align2::CENTER_BOTTOM,
            format!("{v}"),
            egui::FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            egui::pos2(point.x, response.rect.bottom() - 4.0),
            egui::Align2::CENTER_BOTTOM,
            p.date.format("%d.%m").to_string(),
            egui::FontId::proportional(11.0),
            text_color,
        );
    }
}
