//! Tab-separated training manifests.
//!
//! A manifest has one `<path>\t<text>\n` row per training sample and no
//! header. Tabs, carriage returns and newlines inside a field would break
//! that schema, so they are replaced with a single space before writing.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::GtPrepError;

/// Streaming manifest writer.
pub struct ManifestWriter<W: Write> {
    inner: csv::Writer<W>,
    path: PathBuf,
    rows: usize,
}

impl ManifestWriter<BufWriter<File>> {
    /// Creates (or truncates) the manifest at `path`, creating parent
    /// directories as needed.
    pub fn create(path: &Path) -> Result<Self, GtPrepError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GtPrepError::ManifestCreate {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| GtPrepError::ManifestCreate {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_writer(BufWriter::new(file), path))
    }
}

impl<W: Write> ManifestWriter<W> {
    /// Wraps an arbitrary writer. `path` is only used in error messages.
    pub fn from_writer(writer: W, path: &Path) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(writer);

        Self {
            inner,
            path: path.to_path_buf(),
            rows: 0,
        }
    }

    /// Appends one row. Returns true if either field had to be sanitized.
    pub fn write_row(&mut self, sample_path: &str, text: &str) -> Result<bool, GtPrepError> {
        let sample_path = sanitize_field(sample_path);
        let text = sanitize_field(text);
        let sanitized = matches!(sample_path, Cow::Owned(_)) || matches!(text, Cow::Owned(_));

        self.inner
            .write_record([&*sample_path, &*text])
            .map_err(|source| GtPrepError::ManifestWrite {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;

        Ok(sanitized)
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes buffered rows and returns the underlying writer.
    pub fn finish(self) -> Result<W, GtPrepError> {
        let path = self.path;
        let mut writer = self
            .inner
            .into_inner()
            .map_err(|err| GtPrepError::ManifestWrite {
                path: path.clone(),
                source: csv::Error::from(err.into_error()),
            })?;
        writer.flush().map_err(|source| GtPrepError::ManifestWrite {
            path,
            source: csv::Error::from(source),
        })?;
        Ok(writer)
    }
}

/// Replaces every tab, CR and LF with a single space.
pub fn sanitize_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\r', '\n']) {
        Cow::Owned(field.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(field)
    }
}

/// Relative image path used in full-text rows: `<prefix>/<file_name>`.
pub fn prefixed_path(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches(['/', '\\']);
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}
