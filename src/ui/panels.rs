use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::ExportFormat;
use crate::state::{AppState, View};
use crate::units::Unit;

// ---------------------------------------------------------------------------
// Left side panel – datasets, views and options
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Dataset");
            ui.separator();
            match state.file.as_ref().map(|f| f.names()) {
                Some(names) => {
                    for (i, name) in names.iter().enumerate() {
                        if ui.radio(state.selected == i, name).clicked() {
                            state.select_dataset(i);
                        }
                    }
                }
                None => {
                    ui.label("No data loaded.");
                }
            }
            ui.add_space(8.0);

            ui.heading("Views");
            ui.separator();
            let enabled = state.analysis.is_some();
            for view in View::ALL {
                let button = egui::Button::new(view.label()).selected(state.view == view);
                if ui.add_enabled(enabled, button).clicked() {
                    state.set_view(view);
                }
            }
            if ui
                .add_enabled(enabled, egui::Button::new(RichText::new("Export Report").strong()))
                .clicked()
            {
                state.export_report();
            }
            ui.add_space(8.0);

            ui.heading("Options");
            ui.separator();
            options_grid(ui, state);
        });
}

fn options_grid(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("options_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Unit");
            let mut unit = state.config.output.unit;
            egui::ComboBox::from_id_salt("unit")
                .selected_text(unit.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for u in Unit::ALL {
                        ui.selectable_value(&mut unit, u, u.to_string());
                    }
                });
            state.set_unit(unit);
            ui.end_row();

            ui.label("Moving avg (years)");
            let mut window = state.config.analysis.moving_average_window;
            if ui
                .add(egui::DragValue::new(&mut window).range(1..=50))
                .changed()
            {
                state.set_window(window);
            }
            ui.end_row();

            ui.label("Extreme threshold (σ)");
            let mut sigma = state.config.analysis.extreme_sigma;
            if ui
                .add(egui::DragValue::new(&mut sigma).range(0.5..=5.0).speed(0.05))
                .changed()
            {
                state.set_sigma(sigma);
            }
            ui.end_row();

            ui.label("Export format");
            let mut format = state.config.output.format;
            egui::ComboBox::from_id_salt("export_format")
                .selected_text(format.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for f in ExportFormat::ALL {
                        ui.selectable_value(&mut format, f, f.to_string());
                    }
                });
            state.set_format(format);
            ui.end_row();
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export Report"))
                .clicked()
            {
                state.export_report();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            let (first, last) = ds.year_range().unwrap_or_default();
            ui.label(format!("{}: {} years ({first}–{last})", ds.name, ds.len()));
        }
    });
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| match &state.status {
        Some(status) => {
            let text = format!("[{}] {}", status.at.format("%H:%M:%S"), status.message);
            let text = if status.is_error {
                RichText::new(text).color(Color32::RED)
            } else {
                RichText::new(text)
            };
            ui.label(text);
        }
        None => {
            ui.label("Ready");
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open GISS temperature data")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
