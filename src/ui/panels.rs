use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::analytics::kpi;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Sales Pulse");
        ui.separator();

        if ui.button("Reload").clicked() {
            state.force_reload();
        }

        ui.separator();
        ui.label(format!(
            "{} rows loaded, {} visible",
            state.table.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: date range, countries, categories.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No data loaded.");
        return;
    }

    // Clone the dimension sets so we can mutate state inside the loops.
    let countries: Vec<String> = state.table.countries.iter().cloned().collect();
    let categories: Vec<String> = state.table.categories.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Order date");
            let mut start = state.filters.start_date.unwrap_or_else(AppState::today);
            let mut end = state.filters.end_date.unwrap_or_else(AppState::today);

            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                if ui
                    .add(DatePickerButton::new(&mut start).id_salt("start_date"))
                    .changed()
                {
                    state.filters.start_date = Some(start);
                    state.refilter();
                }
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("To");
                if ui
                    .add(DatePickerButton::new(&mut end).id_salt("end_date"))
                    .changed()
                {
                    state.filters.end_date = Some(end);
                    state.refilter();
                }
            });
            ui.separator();

            // ---- Country subset ----
            subset_group(
                ui,
                "Countries",
                &countries,
                state,
                |state| state.filters.countries.clone(),
                AppState::toggle_country,
                AppState::clear_countries,
            );
            ui.separator();

            // ---- Category subset ----
            subset_group(
                ui,
                "Categories",
                &categories,
                state,
                |state| state.filters.categories.clone(),
                AppState::toggle_category,
                AppState::clear_categories,
            );
        });
}

/// One collapsible checkbox group. An empty selection means "no restriction",
/// matching the filter engine.
#[allow(clippy::too_many_arguments)]
fn subset_group(
    ui: &mut Ui,
    title: &str,
    values: &[String],
    state: &mut AppState,
    selected_of: fn(&AppState) -> std::collections::BTreeSet<String>,
    toggle: fn(&mut AppState, &str),
    clear: fn(&mut AppState),
) {
    let selected = selected_of(state);
    let header_text = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                clear(state);
            }
            for value in values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    toggle(state, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

/// Headline KPI cards above the tabs.
pub fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let summary = kpi::summarize(&state.table, &state.visible_indices);

    ui.horizontal(|ui: &mut Ui| {
        kpi_card(
            ui,
            "Total Revenue",
            format!("${}", thousands(summary.total_revenue)),
        );
        kpi_card(
            ui,
            "Avg Margin",
            summary
                .avg_margin
                .map(|m| format!("{m:.1}%"))
                .unwrap_or_else(|| "–".to_string()),
        );
        kpi_card(ui, "Active Customers", thousands(summary.customers as f64));
        kpi_card(
            ui,
            "Avg Order Value",
            summary
                .avg_order_value
                .map(|v| format!("${v:.0}"))
                .unwrap_or_else(|| "–".to_string()),
        );
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(value).heading());
            ui.label(RichText::new(label).small());
        });
    });
}

/// Format a number with thousands separators, no decimals.
fn thousands(v: f64) -> String {
    let negative = v < 0.0;
    let digits = format!("{:.0}", v.abs());
    let mut out = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        out.push('-');
    }
    out.chars().rev().collect()
}
