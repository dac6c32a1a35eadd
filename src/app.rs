use eframe::egui;

use crate::state::AppState;
use crate::ui::{gallery, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BrandBrowserApp {
    pub state: AppState,
}

impl Default for BrandBrowserApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for BrandBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: brand search ----
        egui::SidePanel::left("brand_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: distribution, gallery, preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            gallery::central_view(ui, &mut self.state);
        });
    }
}
