use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Tab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesPulseApp {
    pub state: AppState,
}

impl SalesPulseApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SalesPulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Cache-window check: a hit is cheap, an expired snapshot reloads.
        self.state.refresh();

        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs + tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::kpi_strip(ui, &self.state);
            ui.separator();

            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui
                        .selectable_label(self.state.active_tab == tab, tab.label())
                        .clicked()
                    {
                        self.state.active_tab = tab;
                    }
                }
            });
            ui.separator();

            match self.state.active_tab {
                Tab::Sales => charts::sales_tab(ui, &self.state),
                Tab::Customers => charts::customers_tab(ui, &self.state),
                Tab::Products => charts::products_tab(ui, &self.state),
                Tab::Operations => charts::operations_tab(ui, &self.state),
                Tab::Explorer => table::explorer_tab(ui, &mut self.state),
            }
        });
    }
}
