//! Pass configuration and YAML job files.
//!
//! A [`PassConfig`] describes one batch pass over an image/annotation
//! directory pair. Every field has a default, so a job file only needs to
//! name what differs:
//!
//! ```yaml
//! passes:
//!   - name: train
//!     mode: per_line
//!     images_dir: data/images
//!     gt_dir: data/gt
//!     crops_dir: data/images_cropped
//!     output: data/gt_cropped.txt
//!   - name: val
//!     mode: full_text
//!     images_dir: val_data/images
//!     gt_dir: val_data/gt
//!     output: val_data/gt.txt
//!     encodings: [utf-8, cp1252]
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::GtPrepError;
use crate::gt::TextEncoding;

/// What a pass writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One row per image with all labels space-joined.
    #[default]
    FullText,
    /// One cropped image and one row per text line.
    PerLine,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::FullText => "full_text",
            Mode::PerLine => "per_line",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which index goes into `<stem>_line<NNN>.jpg`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropIndex {
    /// The line's position in the annotation file; dropped lines leave gaps.
    #[default]
    Line,
    /// A counter over saved crops: 000, 001, 002, ...
    Dense,
}

/// Configuration for a single pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassConfig {
    pub mode: Mode,
    /// Directory holding `<stem>.<image_extension>` images.
    pub images_dir: PathBuf,
    /// Directory holding `<stem>.txt` ground-truth files.
    pub gt_dir: PathBuf,
    /// Manifest to write (overwritten).
    pub output: PathBuf,
    /// Where crops are written in `per_line` mode.
    pub crops_dir: PathBuf,
    /// Extension of source images, without the dot.
    pub image_extension: String,
    /// Directory prefix for image paths in `full_text` rows.
    pub image_prefix: String,
    /// Candidate encodings, tried in order.
    pub encodings: Vec<TextEncoding>,
    pub crop_index: CropIndex,
    /// Crops narrower or shorter than this (after clipping) are dropped.
    pub min_crop_size: u32,
    /// Log a progress line every this many processed files.
    pub progress_every: usize,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            mode: Mode::FullText,
            images_dir: PathBuf::from("data/images"),
            gt_dir: PathBuf::from("data/gt"),
            output: PathBuf::from("data/gt.txt"),
            crops_dir: PathBuf::from("data/images_cropped"),
            image_extension: "jpg".to_string(),
            image_prefix: "images".to_string(),
            encodings: TextEncoding::DEFAULT_CANDIDATES.to_vec(),
            crop_index: CropIndex::Line,
            min_crop_size: 5,
            progress_every: 50,
        }
    }
}

impl PassConfig {
    /// Line-crop configuration rooted at `root` (`<root>/images`, `<root>/gt`,
    /// `<root>/images_cropped`, `<root>/gt_cropped.txt`).
    pub fn per_line_under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            mode: Mode::PerLine,
            images_dir: root.join("images"),
            gt_dir: root.join("gt"),
            output: root.join("gt_cropped.txt"),
            crops_dir: root.join("images_cropped"),
            ..Default::default()
        }
    }

    /// Full-text configuration rooted at `root` (`<root>/images`, `<root>/gt`,
    /// `<root>/gt.txt`).
    pub fn full_text_under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            mode: Mode::FullText,
            images_dir: root.join("images"),
            gt_dir: root.join("gt"),
            output: root.join("gt.txt"),
            crops_dir: root.join("images_cropped"),
            ..Default::default()
        }
    }

    /// Rejects settings no pass can run with.
    pub fn validate(&self) -> Result<(), GtPrepError> {
        if self.encodings.is_empty() {
            return Err(invalid("at least one encoding is required"));
        }
        if self.progress_every == 0 {
            return Err(invalid("progress_every must be at least 1"));
        }
        let ext = self.image_extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(invalid("image_extension must not be empty"));
        }
        if self.mode == Mode::PerLine && self.crops_dir.as_os_str().is_empty() {
            return Err(invalid("crops_dir is required in per_line mode"));
        }
        Ok(())
    }

    /// `<stem>.<ext>`, tolerating an extension written with a leading dot.
    pub fn image_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.image_extension.trim_start_matches('.'))
    }
}

fn invalid(message: &str) -> GtPrepError {
    GtPrepError::InvalidConfig {
        message: message.to_string(),
    }
}

/// A named pass inside a job file.
///
/// `name` sits next to the [`PassConfig`] keys in the same mapping. Any
/// other key must be a `PassConfig` field, so a misspelled option is an
/// error instead of a silent fallback to its default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedPass {
    pub name: String,
    #[serde(flatten)]
    pub config: PassConfig,
}

impl<'de> Deserialize<'de> for NamedPass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = serde_yaml::Mapping::deserialize(deserializer)?;
        let name = match fields.remove("name") {
            Some(serde_yaml::Value::String(name)) => name,
            Some(_) => return Err(de::Error::custom("pass name must be a string")),
            None => return Err(de::Error::missing_field("name")),
        };
        let config = serde_yaml::from_value(serde_yaml::Value::Mapping(fields))
            .map_err(|err| de::Error::custom(format!("pass '{name}': {err}")))?;

        Ok(Self { name, config })
    }
}

/// A list of passes run back to back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    pub passes: Vec<NamedPass>,
}

impl JobFile {
    /// Reads a YAML job file.
    pub fn read(path: &Path) -> Result<Self, GtPrepError> {
        let data = fs::read_to_string(path).map_err(|source| GtPrepError::JobFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&data).map_err(|err| match err {
            GtPrepError::JobFileParse { source, .. } => GtPrepError::JobFileParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses a YAML job file and validates each pass.
    pub fn from_yaml_str(data: &str) -> Result<Self, GtPrepError> {
        let job: JobFile =
            serde_yaml::from_str(data).map_err(|source| GtPrepError::JobFileParse {
                path: PathBuf::from("<string>"),
                source,
            })?;

        if job.passes.is_empty() {
            return Err(invalid("job file lists no passes"));
        }
        for pass in &job.passes {
            pass.config.validate().map_err(|err| match err {
                GtPrepError::InvalidConfig { message } => GtPrepError::InvalidConfig {
                    message: format!("pass '{}': {}", pass.name, message),
                },
                other => other,
            })?;
        }

        Ok(job)
    }

    /// The training + validation line-crop run over `data/` and `val_data/`.
    pub fn default_plan() -> Self {
        Self {
            passes: vec![
                NamedPass {
                    name: "train".to_string(),
                    config: PassConfig::per_line_under("data"),
                },
                NamedPass {
                    name: "val".to_string(),
                    config: PassConfig::per_line_under("val_data"),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_data_layout() {
        let config = PassConfig::default();
        assert_eq!(config.images_dir, PathBuf::from("data/images"));
        assert_eq!(config.output, PathBuf::from("data/gt.txt"));
        assert_eq!(config.encodings.len(), 4);
        assert_eq!(config.min_crop_size, 5);
        assert_eq!(config.progress_every, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn job_file_fills_in_defaults() {
        let job = JobFile::from_yaml_str(
            "passes:\n  - name: val\n    mode: per_line\n    gt_dir: val_data/gt\n    encodings: [utf-8, windows-1252]\n",
        )
        .expect("parse job file");

        assert_eq!(job.passes.len(), 1);
        let pass = &job.passes[0];
        assert_eq!(pass.name, "val");
        assert_eq!(pass.config.mode, Mode::PerLine);
        assert_eq!(pass.config.gt_dir, PathBuf::from("val_data/gt"));
        assert_eq!(pass.config.images_dir, PathBuf::from("data/images"));
        assert_eq!(
            pass.config.encodings,
            vec![TextEncoding::Utf8, TextEncoding::Cp1252]
        );
        assert_eq!(pass.config.crop_index, CropIndex::Line);
    }

    #[test]
    fn job_file_rejects_unknown_encoding() {
        let err = JobFile::from_yaml_str("passes:\n  - name: a\n    encodings: [klingon]\n")
            .unwrap_err();
        assert!(matches!(err, GtPrepError::JobFileParse { .. }));
    }

    #[test]
    fn job_file_rejects_misspelled_keys() {
        let err = JobFile::from_yaml_str(
            "passes:\n  - name: val\n    outptu: val_data/gt.txt\n    image_dir: val_data/images\n",
        )
        .unwrap_err();
        match err {
            GtPrepError::JobFileParse { source, .. } => {
                let message = source.to_string();
                assert!(message.contains("pass 'val'"), "{message}");
                assert!(message.contains("outptu"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn job_file_requires_pass_name() {
        let err = JobFile::from_yaml_str("passes:\n  - mode: per_line\n").unwrap_err();
        match err {
            GtPrepError::JobFileParse { source, .. } => {
                assert!(source.to_string().contains("name"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_job_file_names_its_path() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("jobs.yaml");

        let err = JobFile::read(&path).unwrap_err();
        assert!(matches!(err, GtPrepError::JobFileRead { .. }));
        assert!(err.to_string().contains("jobs.yaml"));
    }

    #[test]
    fn job_file_rejects_empty_encodings() {
        let err =
            JobFile::from_yaml_str("passes:\n  - name: a\n    encodings: []\n").unwrap_err();
        match err {
            GtPrepError::InvalidConfig { message } => assert!(message.contains("pass 'a'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn job_file_rejects_empty_pass_list() {
        let err = JobFile::from_yaml_str("passes: []\n").unwrap_err();
        assert!(matches!(err, GtPrepError::InvalidConfig { .. }));
    }

    #[test]
    fn default_plan_runs_train_then_val() {
        let plan = JobFile::default_plan();
        let names: Vec<&str> = plan.passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["train", "val"]);
        assert_eq!(
            plan.passes[1].config.crops_dir,
            PathBuf::from("val_data/images_cropped")
        );
        assert_eq!(
            plan.passes[1].config.output,
            PathBuf::from("val_data/gt_cropped.txt")
        );
    }

    #[test]
    fn image_file_name_tolerates_leading_dot() {
        let config = PassConfig {
            image_extension: ".png".to_string(),
            ..Default::default()
        };
        assert_eq!(config.image_file_name("r001"), "r001.png");
    }
}
