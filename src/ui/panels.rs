use eframe::egui::{self, Color32, RichText, Ui};

use sahie_dash::data::model::{FIRST_YEAR, LAST_YEAR};
use sahie_dash::data::pipeline::QueryContext;
use sahie_dash::data::view::ViewMode;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year and state selection
// ---------------------------------------------------------------------------

/// Render the selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.states.is_empty() {
        ui.label("No states in the database.");
        return;
    }

    ui.strong("Select Year:");
    let year_text = state
        .pending_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Year".to_string());
    egui::ComboBox::from_id_salt("year_dropdown")
        .selected_text(year_text)
        .show_ui(ui, |ui: &mut Ui| {
            for year in FIRST_YEAR..=LAST_YEAR {
                ui.selectable_value(&mut state.pending_year, Some(year), year.to_string());
            }
        });
    ui.add_space(6.0);

    ui.strong("Select State:");
    let state_text = state
        .pending_state
        .as_deref()
        .and_then(|code| state.states.iter().find(|s| s.code == code))
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "State".to_string());
    egui::ComboBox::from_id_salt("state_dropdown")
        .selected_text(state_text)
        .height(400.0)
        .show_ui(ui, |ui: &mut Ui| {
            for sc in &state.states {
                ui.selectable_value(&mut state.pending_state, Some(sc.code.clone()), &sc.name);
            }
        });
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        let target = state.submit_target();
        if ui
            .add_enabled(target.is_some(), egui::Button::new("Submit"))
            .clicked()
        {
            state.submit();
        }
        if ui.button("Home").clicked() {
            state.navigate("/");
        }
    });
}

// ---------------------------------------------------------------------------
// Tabs above the chart
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for mode in ViewMode::ALL {
            if ui
                .selectable_label(state.tab == mode, mode.tab_label())
                .clicked()
            {
                state.tab = mode;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open database…").clicked() {
                open_database_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.visible_rows.is_ok(), egui::Button::new("Export table…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.database().display().to_string());

        ui.separator();
        match &state.context {
            QueryContext::NoSelection => {
                ui.label("No state selected");
            }
            QueryContext::Active(sel) => {
                ui.label(format!("{} ({}) {}", sel.statename, sel.statecode, sel.year));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_database_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open census database")
        .add_filter("SQLite database", &["db", "sqlite", "sqlite3"])
        .pick_file();

    if let Some(path) = file {
        state.open_database(path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Export state data table")
        .add_filter("CSV", &["csv"])
        .set_file_name("state_data.csv");
    if let Some(dir) = &state.config.export_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(path) = dialog.save_file() {
        state.export_table(&path);
    }
}
