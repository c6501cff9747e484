use eframe::egui::{Color32, Ui};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, Legend, Line, Plot, PlotPoints};

use sahie_dash::data::codes::{Category, IncomeRatio, Race};
use sahie_dash::data::model::{CountyRow, DemographicRow, TimeRow};
use sahie_dash::data::view::ShapedView;

use crate::color::RaceColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart for the active tab (central panel)
// ---------------------------------------------------------------------------

/// Render the chart of the active tab, or a placeholder.
pub fn chart(ui: &mut Ui, state: &AppState) {
    let view = match state.shaped_view() {
        Ok(view) => view,
        Err(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(msg);
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(view.title());
    });

    match &view {
        ShapedView::County { rows, .. } => county_bars(ui, rows),
        ShapedView::Demographic { rows, .. } => demographic_bars(ui, rows, &state.race_colors),
        ShapedView::Time { rows, .. } => time_line(ui, rows),
    }
}

fn county_bars(ui: &mut Ui, rows: &[CountyRow]) {
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.percent_uninsured)
                .name(&r.county)
                .width(0.8)
        })
        .collect();
    let names: Vec<String> = rows.iter().map(|r| r.county.clone()).collect();

    Plot::new("county_plot")
        .x_axis_label("County")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| category_tick(&names, mark.value))
        .y_axis_label("Percent Uninsured")
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

/// Grouped bars: one group per income band, one bar per race.
fn demographic_bars(ui: &mut Ui, rows: &[DemographicRow], colors: &RaceColors) {
    let group_width = 0.8;
    let bar_width = group_width / Race::ALL.len() as f64;

    let charts: Vec<BarChart> = Race::ALL
        .iter()
        .enumerate()
        .map(|(slot, race)| {
            let bars: Vec<Bar> = rows
                .iter()
                .filter(|r| r.race == *race)
                .map(|r| {
                    let x = band_index(r.income_ratio) - group_width / 2.0
                        + bar_width * (slot as f64 + 0.5);
                    Bar::new(x, r.percent_uninsured)
                        .name(format!("{} / {}", r.race, r.income_ratio))
                        .width(bar_width)
                })
                .collect();
            BarChart::new(bars)
                .name(race.label())
                .color(colors.color_for(*race))
        })
        .collect();

    Plot::new("demographic_plot")
        .legend(Legend::default())
        .x_axis_label("IPR")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 6.0]))
        .x_axis_formatter(|mark, _range| category_tick(IncomeRatio::ALL, mark.value))
        .y_axis_label("Percent Uninsured")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn band_index(ratio: IncomeRatio) -> f64 {
    IncomeRatio::ALL
        .iter()
        .position(|r| *r == ratio)
        .unwrap_or_default() as f64
}

/// Tick label for a bar placed at an integer index; blank between bars.
fn category_tick<L: ToString>(labels: &[L], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels
        .get(index as usize)
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn time_line(ui: &mut Ui, rows: &[TimeRow]) {
    let points: PlotPoints = rows
        .iter()
        .map(|r| [r.year as f64, r.percent_uninsured])
        .collect();

    Plot::new("time_plot")
        .x_axis_label("Year")
        .y_axis_label("Percent Uninsured")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Percent Uninsured")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}
