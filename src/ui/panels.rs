use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::ingest::UploadedFile;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – brand search
// ---------------------------------------------------------------------------

/// Render the brand selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search By Brand");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let brands = dataset.brands();
    if brands.is_empty() {
        ui.label("The dataset has no brand column.");
        return;
    }

    let current = state.selected_brand.clone().unwrap_or_default();
    let mut picked: Option<String> = None;

    ui.strong("Select Brand");
    egui::ComboBox::from_id_salt("brand_select")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for brand in &brands {
                if ui.selectable_label(current == *brand, brand).clicked() {
                    picked = Some(brand.clone());
                }
            }
        });

    if let Some(brand) = picked {
        state.select_brand(brand);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload CSV…").clicked() {
                upload_csv_dialog(state);
                ui.close_menu();
            }
            if ui.button("Upload Images…").clicked() {
                upload_images_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} ads joined from {} uploaded images",
                ds.len(),
                state.pending_images.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Upload dialogs
// ---------------------------------------------------------------------------

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{}: file name is not valid UTF-8", path.display()))?
        .to_string();
    Ok(UploadedFile::new(name, bytes))
}

pub fn upload_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match read_upload(&path) {
            Ok(upload) => state.set_csv(upload),
            Err(e) => {
                log::error!("failed to read CSV upload: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn upload_images_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload images")
        .add_filter("PNG images", &["png"])
        .pick_files();

    let Some(paths) = files else { return };

    let mut uploads = Vec::with_capacity(paths.len());
    let mut read_errors = Vec::new();
    for path in &paths {
        match read_upload(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                log::error!("failed to read image upload: {e:#}");
                read_errors.push(format!("Error: {e:#}"));
            }
        }
    }

    state.set_images(uploads);
    // Keep local read failures visible alongside the ingest skip notes.
    state.file_messages.extend(read_errors);
}
