use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gtprep operations.
///
/// The per-file variants (`Annotation*`, `Image*`, `CropSave`) never abort a
/// pass: the pass turns them into issues on its
/// [`ConversionReport`](crate::convert::ConversionReport) and moves on.
#[derive(Debug, Error)]
pub enum GtPrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read annotation file {path}: {source}")]
    AnnotationRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {path} with any encoding (tried {tried})")]
    AnnotationUndecodable { path: PathBuf, tried: String },

    #[error("Could not read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not save {path}: {source}")]
    CropSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to create output manifest {path}: {source}")]
    ManifestCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to create crop directory {path}: {source}")]
    CropDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read job file {path}: {source}")]
    JobFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse job file {path}: {source}")]
    JobFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize report as JSON: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}
