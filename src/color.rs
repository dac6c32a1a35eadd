use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Cluster color mapping: cluster value → Color32
// ---------------------------------------------------------------------------

/// Hue step between consecutive clusters (golden angle, keeps neighbours
/// visually distinct even for small cluster counts).
const HUE_STEP: f32 = 137.508;

/// Maps each distinct cluster value to a stable display color, used to
/// tint cluster headers and peer captions.
#[derive(Debug, Clone)]
pub struct ClusterColors {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ClusterColors {
    /// Build the mapping from the sorted set of cluster values.
    pub fn new(clusters: &BTreeSet<CellValue>) -> Self {
        let mapping: BTreeMap<CellValue, Color32> = clusters
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let hue = (i as f32 * HUE_STEP) % 360.0;
                let hsl = Hsl::new(hue, 0.65, 0.55);
                let rgb: Srgb = hsl.into_color();
                let color = Color32::from_rgb(
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                );
                (v.clone(), color)
            })
            .collect();

        ClusterColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the color for a cluster value.
    pub fn color_for(&self, cluster: &CellValue) -> Color32 {
        self.mapping
            .get(cluster)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_stable_and_distinct() {
        let clusters: BTreeSet<CellValue> =
            (0..4).map(CellValue::Integer).collect();
        let colors = ClusterColors::new(&clusters);

        let c0 = colors.color_for(&CellValue::Integer(0));
        let c1 = colors.color_for(&CellValue::Integer(1));
        assert_ne!(c0, c1);
        assert_eq!(c0, colors.color_for(&CellValue::Integer(0)));
        // Unknown clusters fall back to gray.
        assert_eq!(colors.color_for(&CellValue::Integer(99)), Color32::GRAY);
    }
}
