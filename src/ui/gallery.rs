use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::AdRecord;
use crate::data::views::{attribute_rows, brand_rows, cluster_distribution, cluster_peers};
use crate::data::CLUSTER_COLUMN;
use crate::state::AppState;

/// How many brand images the gallery shows (display truncation only).
const BRAND_GALLERY_COLUMNS: usize = 4;
/// Width of the preview image.
const PREVIEW_WIDTH: f32 = 300.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the main view: distribution table, brand gallery, preview.
pub fn central_view(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a CSV file and images to continue  (File → Upload…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for msg in &state.file_messages {
                ui.label(RichText::new(msg).color(Color32::RED).small());
            }

            distribution_section(ui, state);
            ui.separator();
            brand_section(ui, state);
            ui.separator();
            preview_section(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Distribution table
// ---------------------------------------------------------------------------

fn distribution_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else { return };

    ui.heading("Number of Ads in Each Cluster");
    match cluster_distribution(dataset) {
        Ok(table) => {
            egui::Grid::new("cluster_distribution")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Brand");
                    for (i, label) in table.column_labels().iter().enumerate() {
                        match table.clusters.get(i) {
                            Some(cluster) => {
                                let color = state
                                    .cluster_colors
                                    .as_ref()
                                    .map(|cc| cc.color_for(cluster))
                                    .unwrap_or(Color32::GRAY);
                                ui.label(RichText::new(label).strong().color(color));
                            }
                            None => {
                                ui.strong(label);
                            }
                        }
                    }
                    ui.end_row();

                    for row in &table.rows {
                        ui.label(&row.brand);
                        for count in &row.counts {
                            ui.label(count.to_string());
                        }
                        ui.strong(row.total.to_string());
                        ui.end_row();
                    }
                });
        }
        Err(err) => {
            ui.colored_label(Color32::RED, err.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Brand gallery
// ---------------------------------------------------------------------------

fn ad_image(ad: &AdRecord) -> egui::Image<'static> {
    egui::Image::from_uri(format!("file://{}", ad.image_path.display()))
}

fn brand_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else { return };
    let Some(brand) = &state.selected_brand else { return };

    ui.heading("Images By Brand");
    let rows = brand_rows(dataset, brand);
    if rows.is_empty() {
        ui.label(format!("No ads for brand '{brand}'."));
        return;
    }

    let shown = &rows[..rows.len().min(BRAND_GALLERY_COLUMNS)];
    ui.columns(BRAND_GALLERY_COLUMNS, |cols: &mut [Ui]| {
        for (i, ad) in shown.iter().enumerate() {
            let width = cols[i].available_width();
            cols[i].add(ad_image(ad).max_width(width));
        }
    });
}

// ---------------------------------------------------------------------------
// Preview: selected image, attributes, cluster peers
// ---------------------------------------------------------------------------

fn preview_section(ui: &mut Ui, state: &mut AppState) {
    let mut picked: Option<String> = None;

    {
        let Some(dataset) = &state.dataset else { return };
        let Some(brand) = &state.selected_brand else { return };

        let ad_ids: Vec<String> = brand_rows(dataset, brand)
            .iter()
            .map(|ad| ad.ad_id.clone())
            .collect();
        if ad_ids.is_empty() {
            return;
        }
        let current = state
            .selected_ad
            .clone()
            .unwrap_or_else(|| ad_ids[0].clone());

        ui.heading("Image Preview");
        egui::ComboBox::from_id_salt("preview_ad")
            .selected_text(format!("Ad ID: {current}"))
            .show_ui(ui, |ui: &mut Ui| {
                for id in &ad_ids {
                    if ui
                        .selectable_label(*id == current, format!("Ad ID: {id}"))
                        .clicked()
                    {
                        picked = Some(id.clone());
                    }
                }
            });

        if let Some(record) = dataset.ad(&current) {
            ui.add(ad_image(record).max_width(PREVIEW_WIDTH));

            ui.add_space(4.0);
            ui.heading("Image Attributes");
            attribute_section(ui, record);

            ui.add_space(4.0);
            ui.heading("Images in Same Cluster");
            peers_section(ui, state, record);
        }
    }

    if let Some(id) = picked {
        state.select_ad(id);
    }
}

fn attribute_section(ui: &mut Ui, record: &AdRecord) {
    match attribute_rows(record) {
        Ok(rows) => {
            egui::Grid::new("image_attributes")
                .striped(true)
                .min_col_width(120.0)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Attribute");
                    ui.strong("Label");
                    ui.end_row();
                    for (name, value) in &rows {
                        ui.label(*name);
                        ui.label(value.to_string());
                        ui.end_row();
                    }
                });
        }
        Err(err) => {
            ui.colored_label(Color32::RED, err.to_string());
        }
    }
}

fn peers_section(ui: &mut Ui, state: &AppState, record: &AdRecord) {
    let Some(dataset) = &state.dataset else { return };

    match cluster_peers(dataset, record) {
        Ok(peers) if peers.is_empty() => {
            ui.label("No other ads share this cluster.");
        }
        Ok(peers) => {
            let caption_color = record
                .field(CLUSTER_COLUMN)
                .and_then(|v| state.cluster_colors.as_ref().map(|cc| cc.color_for(v)))
                .unwrap_or(Color32::GRAY);

            ui.columns(peers.len(), |cols: &mut [Ui]| {
                for (i, peer) in peers.iter().enumerate() {
                    let width = cols[i].available_width();
                    cols[i].add(ad_image(peer).max_width(width));
                    cols[i].label(
                        RichText::new(format!("Ad ID: {}", peer.ad_id))
                            .small()
                            .color(caption_color),
                    );
                }
            });
        }
        Err(err) => {
            ui.colored_label(Color32::RED, err.to_string());
        }
    }
}
