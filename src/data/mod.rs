/// Data layer: core types, ingest/join, and derived views.
///
/// Architecture:
/// ```text
///  ads.csv + {ad_id}.png uploads
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  parse CSV, store images, join by filename → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<AdRecord>, column index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  distribution table, brand rows, cluster peers
///   └──────────┘
/// ```
pub mod error;
pub mod ingest;
pub mod model;
pub mod views;

/// Required identifier column; its absence aborts ingest.
pub const AD_ID_COLUMN: &str = "ad_id";
/// Brand column used for grouping and the distribution table.
pub const PAGENAME_COLUMN: &str = "pagename";
/// Cluster column used for peers and the distribution table.
pub const CLUSTER_COLUMN: &str = "cluster";

/// Fixed attribute set shown in the preview table, in display order.
pub const ATTRIBUTE_COLUMNS: [&str; 5] = [
    PAGENAME_COLUMN,
    "dominant_background_colour",
    "logo_present",
    CLUSTER_COLUMN,
    "tier",
];

#[cfg(test)]
mod tests {
    use super::ingest::{build_dataset, UploadStore, UploadedFile};
    use super::views::{brand_rows, cluster_distribution, cluster_peers};

    fn upload(name: &str) -> UploadedFile {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        UploadedFile::new(name, buf.into_inner())
    }

    // Ingest → aggregate → filter, end to end: images exist for ads 1 and 2
    // only, so brand B vanishes entirely from every derived view.
    #[test]
    fn upload_to_views_pipeline() {
        let store = UploadStore::new().unwrap();
        let csv = b"ad_id,pagename,cluster\n1,A,0\n2,A,0\n3,B,1\n";
        let outcome =
            build_dataset(csv, &[upload("1.png"), upload("2.png")], &store).unwrap();
        let ds = outcome.dataset;

        assert_eq!(ds.len(), 2);

        let table = cluster_distribution(&ds).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].brand, "A");
        assert_eq!(table.rows[0].counts, vec![2]);
        assert_eq!(table.rows[0].total, 2);
        assert_eq!(table.column_labels(), vec!["Cluster 0", "Total"]);

        let brand_a: Vec<&str> = brand_rows(&ds, "A").iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(brand_a, vec!["1", "2"]);

        let peers = cluster_peers(&ds, ds.ad("1").unwrap()).unwrap();
        let peer_ids: Vec<&str> = peers.iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(peer_ids, vec!["2"]);
    }
}
