use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use sahie_dash::data::codes::Category;
use sahie_dash::data::filter::Dimension;
use sahie_dash::data::view::ComparisonBand;

use crate::color::band_color;
use crate::state::AppState;

const HEADERS: [&str; 5] = ["Race", "Sex", "IPR", "Percent Uninsured", "Comparison to State"];

// ---------------------------------------------------------------------------
// State data table with its multi-select filters
// ---------------------------------------------------------------------------

pub fn state_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("State Data Table");
    filter_bar(ui, state);
    ui.separator();

    let rows = match &state.visible_rows {
        Ok(rows) => rows,
        Err(msg) => {
            ui.label(msg.as_str());
            return;
        }
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(170.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut tr| {
                    tr.col(|ui| {
                        ui.label(row.race.label());
                    });
                    tr.col(|ui| {
                        ui.label(row.sex.label());
                    });
                    tr.col(|ui| {
                        ui.label(row.income_ratio.label());
                    });
                    tr.col(|ui| {
                        ui.label(format!("{:.2}", row.percent_uninsured));
                    });
                    tr.col(|ui| {
                        let Some(cmp) = row.comparison_to_state else {
                            return;
                        };
                        let mut text = RichText::new(format!("{cmp:.2}"));
                        if let Some(bg) = band_color(ComparisonBand::classify(cmp)) {
                            text = text.background_color(bg).color(egui::Color32::BLACK);
                        }
                        ui.label(text);
                    });
                });
            }
        });
}

/// One multi-select dropdown per dimension; nothing selected means no filter.
fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for dim in Dimension::ALL {
            let n = state.filters.selected_count(dim);
            let text = if n == 0 {
                dim.label().to_string()
            } else {
                format!("{} ({n})", dim.label())
            };
            ui.menu_button(text, |ui: &mut Ui| {
                if ui.small_button("Clear").clicked() {
                    state.clear_filter(dim);
                }
                ui.separator();
                match dim {
                    Dimension::Race => {
                        let selected = state.filters.race.clone();
                        checklist(ui, &selected, |r| state.toggle_race(r));
                    }
                    Dimension::Sex => {
                        let selected = state.filters.sex.clone();
                        checklist(ui, &selected, |s| state.toggle_sex(s));
                    }
                    Dimension::IncomeRatio => {
                        let selected = state.filters.income_ratio.clone();
                        checklist(ui, &selected, |i| state.toggle_income_ratio(i));
                    }
                }
            });
        }
    });
}

fn checklist<C: Category>(
    ui: &mut Ui,
    selected: &BTreeSet<C>,
    mut on_toggle: impl FnMut(C),
) {
    for value in C::ALL.iter().copied() {
        let mut checked = selected.contains(&value);
        if ui.checkbox(&mut checked, value.label()).changed() {
            on_toggle(value);
        }
    }
}
