use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------
//
// Three severities with different propagation:
// * `IngestError`  – aborts ingest; no dataset is produced.
// * `FileError`    – one uploaded file failed; logged and skipped.
// * `ViewError`    – one derived view cannot be computed; other views
//                    keep rendering.

/// Hard ingest failure: the upload batch produced no dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not parse the uploaded CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("the uploaded CSV must contain an '{0}' column")]
    MissingColumn(&'static str),
}

/// Per-file failure while storing an uploaded image. The rest of the
/// batch proceeds.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not store uploaded image '{file_name}': {source}")]
    Storage {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode uploaded image '{file_name}': {source}")]
    Decode {
        file_name: String,
        #[source]
        source: image::ImageError,
    },
}

/// A derived view cannot be computed from the current dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("the dataset must contain a '{column}' column for this view")]
    Schema { column: &'static str },

    #[error("missing attributes in the selected row: {}", missing.join(", "))]
    MissingAttributes { missing: Vec<String> },
}

impl ViewError {
    pub fn schema(column: &'static str) -> Self {
        ViewError::Schema { column }
    }
}
