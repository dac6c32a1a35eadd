use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::error::{FileError, IngestError};
use super::model::{guess_cell_type, AdRecord, Dataset};
use super::AD_ID_COLUMN;

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

/// One file handed over by the upload dialog: original filename + raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// UploadStore – session-scoped image storage
// ---------------------------------------------------------------------------

/// Temporary directory holding the uploaded images for one session.
///
/// The directory is deleted when the store is dropped, i.e. when the host
/// session state replaces or discards it.
#[derive(Debug)]
pub struct UploadStore {
    dir: TempDir,
}

impl UploadStore {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("brand-browser-").tempdir()?;
        std::fs::create_dir_all(dir.path().join("images"))?;
        Ok(Self { dir })
    }

    /// Directory the uploaded images live in.
    pub fn images_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    /// Decode-check and persist one uploaded image.
    ///
    /// An undecodable upload is rejected before anything is written, so the
    /// store only ever contains renderable PNGs.
    pub fn save(&self, file: &UploadedFile) -> Result<PathBuf, FileError> {
        image::load_from_memory(&file.bytes).map_err(|source| FileError::Decode {
            file_name: file.name.clone(),
            source,
        })?;

        let path = self.images_dir().join(&file.name);
        std::fs::write(&path, &file.bytes).map_err(|source| FileError::Storage {
            file_name: file.name.clone(),
            source,
        })?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Ingest/Join
// ---------------------------------------------------------------------------

/// Result of a successful ingest: the joined dataset plus the per-file
/// failures that were skipped along the way.
#[derive(Debug)]
pub struct IngestOutcome {
    pub dataset: Dataset,
    pub skipped_files: Vec<FileError>,
}

/// Parse the uploaded CSV, persist the uploaded images, and join rows to
/// images by the `{ad_id}.png` naming convention.
///
/// Join policy:
/// * the extension is hardcoded to `.png` (known limitation);
/// * rows whose expected image was not uploaded are dropped;
/// * uploads matching no CSV row are silently ignored;
/// * on duplicate `ad_id` values the first row wins, later ones are
///   dropped with a log line.
pub fn build_dataset(
    csv_bytes: &[u8],
    images: &[UploadedFile],
    store: &UploadStore,
) -> Result<IngestOutcome, IngestError> {
    // Persist images first; per-file failures do not abort the batch.
    let mut stored: BTreeSet<String> = BTreeSet::new();
    let mut skipped_files = Vec::new();
    for file in images {
        match store.save(file) {
            Ok(_) => {
                stored.insert(file.name.clone());
            }
            Err(err) => {
                log::warn!("{err}");
                skipped_files.push(err);
            }
        }
    }

    let mut reader = csv::Reader::from_reader(csv_bytes);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let id_idx = headers
        .iter()
        .position(|h| h == AD_ID_COLUMN)
        .ok_or(IngestError::MissingColumn(AD_ID_COLUMN))?;

    let mut ads = Vec::new();
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();

    for record in reader.records() {
        let record = record?;
        let ad_id = record.get(id_idx).unwrap_or("").to_string();

        let expected = format!("{ad_id}.png");
        if !stored.contains(&expected) {
            // Image not uploaded → row excluded (documented policy).
            continue;
        }
        if !seen_ids.insert(ad_id.clone()) {
            log::warn!("duplicate ad_id '{ad_id}' in CSV, keeping the first row");
            continue;
        }

        let mut fields = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == id_idx {
                continue;
            }
            if let Some(col_name) = headers.get(col_idx) {
                fields.insert(col_name.clone(), guess_cell_type(value));
            }
        }

        ads.push(AdRecord {
            ad_id,
            image_path: store.images_dir().join(expected),
            fields,
        });
    }

    Ok(IngestOutcome {
        dataset: Dataset::from_ads(ads),
        skipped_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, png_bytes())
    }

    const CSV: &[u8] = b"ad_id,pagename,cluster\n1,A,0\n2,A,0\n3,B,1\n";

    #[test]
    fn join_keeps_only_rows_with_uploaded_images() {
        let store = UploadStore::new().unwrap();
        let outcome =
            build_dataset(CSV, &[upload("1.png"), upload("2.png")], &store).unwrap();

        let ds = outcome.dataset;
        assert_eq!(ds.len(), 2);
        assert!(ds.ad("1").is_some());
        assert!(ds.ad("2").is_some());
        assert!(ds.ad("3").is_none());
        assert_eq!(
            ds.ad("1").unwrap().field("cluster"),
            Some(&CellValue::Integer(0))
        );
        assert!(ds.ad("1").unwrap().image_path.exists());
    }

    #[test]
    fn unmatched_uploads_are_silently_ignored() {
        let store = UploadStore::new().unwrap();
        let outcome =
            build_dataset(CSV, &[upload("1.png"), upload("99.png")], &store).unwrap();
        assert_eq!(outcome.dataset.len(), 1);
        assert!(outcome.skipped_files.is_empty());
    }

    #[test]
    fn missing_ad_id_column_aborts_ingest() {
        let store = UploadStore::new().unwrap();
        let err = build_dataset(b"pagename,cluster\nA,0\n", &[upload("1.png")], &store)
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("ad_id")));
    }

    #[test]
    fn undecodable_image_is_skipped_not_fatal() {
        let store = UploadStore::new().unwrap();
        let bad = UploadedFile::new("1.png", b"not a png".to_vec());
        let outcome = build_dataset(CSV, &[bad, upload("2.png")], &store).unwrap();

        // Row 1 lost its image, row 2 survives; the failure is reported.
        assert_eq!(outcome.dataset.len(), 1);
        assert!(outcome.dataset.ad("2").is_some());
        assert_eq!(outcome.skipped_files.len(), 1);
        assert!(matches!(&outcome.skipped_files[0], FileError::Decode { file_name, .. } if file_name == "1.png"));
    }

    #[test]
    fn duplicate_ad_id_keeps_first_row() {
        let store = UploadStore::new().unwrap();
        let csv = b"ad_id,pagename,cluster\n1,A,0\n1,B,7\n";
        let outcome = build_dataset(csv, &[upload("1.png")], &store).unwrap();

        let ds = outcome.dataset;
        assert_eq!(ds.len(), 1);
        assert_eq!(
            ds.ad("1").unwrap().field("pagename"),
            Some(&CellValue::String("A".into()))
        );
    }

    #[test]
    fn malformed_csv_is_a_parse_error() {
        let store = UploadStore::new().unwrap();
        // Second row has more fields than the header.
        let csv = b"ad_id,pagename\n1,A,stray\n";
        let err = build_dataset(csv, &[upload("1.png")], &store).unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }
}
