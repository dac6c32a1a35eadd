use crate::color::ClusterColors;
use crate::data::ingest::{build_dataset, UploadStore, UploadedFile};
use crate::data::model::Dataset;
use crate::data::views::brand_rows;
use crate::data::CLUSTER_COLUMN;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// The UI layer owns one of these; every view is computed from it on
/// demand. The upload store lives here so the joined dataset's image
/// paths stay valid for the lifetime of the session.
#[derive(Default)]
pub struct AppState {
    /// Latest uploaded CSV (None until the user picks one).
    pub pending_csv: Option<UploadedFile>,

    /// Latest uploaded image batch.
    pub pending_images: Vec<UploadedFile>,

    /// Session-scoped storage backing `dataset`'s image paths.
    store: Option<UploadStore>,

    /// Joined dataset (None until both uploads are present and ingest
    /// succeeded).
    pub dataset: Option<Dataset>,

    /// Brand chosen in the side panel.
    pub selected_brand: Option<String>,

    /// Ad chosen in the preview dropdown.
    pub selected_ad: Option<String>,

    /// Cluster value → display color for the current dataset.
    pub cluster_colors: Option<ClusterColors>,

    /// Fatal ingest error shown in the top bar.
    pub status_message: Option<String>,

    /// Per-file ingest failures (skipped uploads), shown above the views.
    pub file_messages: Vec<String>,
}

impl AppState {
    /// Record a newly uploaded CSV and rebuild.
    pub fn set_csv(&mut self, file: UploadedFile) {
        self.pending_csv = Some(file);
        self.rebuild();
    }

    /// Record a newly uploaded image batch and rebuild.
    pub fn set_images(&mut self, files: Vec<UploadedFile>) {
        self.pending_images = files;
        self.rebuild();
    }

    /// Discard the current dataset and rebuild it from the pending
    /// uploads. A no-op until both a CSV and at least one image exist.
    fn rebuild(&mut self) {
        let Some(csv) = &self.pending_csv else { return };
        if self.pending_images.is_empty() {
            return;
        }

        let store = match UploadStore::new() {
            Ok(store) => store,
            Err(err) => {
                log::error!("could not create session storage: {err}");
                self.status_message = Some(format!("Error creating session storage: {err}"));
                return;
            }
        };

        match build_dataset(&csv.bytes, &self.pending_images, &store) {
            Ok(outcome) => {
                log::info!(
                    "joined {} ads with columns {:?}",
                    outcome.dataset.len(),
                    outcome.dataset.column_names
                );
                self.file_messages = outcome
                    .skipped_files
                    .iter()
                    .map(|e| e.to_string())
                    .collect();
                self.cluster_colors = outcome
                    .dataset
                    .unique_values
                    .get(CLUSTER_COLUMN)
                    .map(ClusterColors::new);

                let first_brand = outcome.dataset.brands().first().cloned();
                self.selected_ad = first_brand.as_deref().and_then(|brand| {
                    brand_rows(&outcome.dataset, brand)
                        .first()
                        .map(|ad| ad.ad_id.clone())
                });
                self.selected_brand = first_brand;
                self.dataset = Some(outcome.dataset);
                // Replacing the store drops the previous session directory.
                self.store = Some(store);
                self.status_message = None;
            }
            Err(err) => {
                log::error!("ingest failed: {err}");
                self.dataset = None;
                self.store = None;
                self.cluster_colors = None;
                self.selected_brand = None;
                self.selected_ad = None;
                self.file_messages.clear();
                self.status_message = Some(format!("Error: {err}"));
            }
        }
    }

    /// Switch brand; the preview defaults to the brand's first ad.
    pub fn select_brand(&mut self, brand: String) {
        self.selected_ad = self
            .dataset
            .as_ref()
            .and_then(|ds| brand_rows(ds, &brand).first().map(|ad| ad.ad_id.clone()));
        self.selected_brand = Some(brand);
    }

    /// Switch the previewed ad.
    pub fn select_ad(&mut self, ad_id: String) {
        self.selected_ad = Some(ad_id);
    }
}
