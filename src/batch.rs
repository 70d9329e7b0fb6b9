// Batch normalization of audio directories
// Mirrors an input directory into an output directory of normalized clips,
// isolating per-file failures so one bad clip cannot abort the batch

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AudioError, AudioResult};
use crate::normalize::{normalize_file, NormalizeConfig};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, one per successfully normalized input
    pub written: Vec<PathBuf>,

    /// Inputs that failed, with the error that stopped them
    pub failed: Vec<(PathBuf, AudioError)>,
}

impl BatchReport {
    /// True when every matching input file was normalized.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Normalize every audio file in `input_dir` into `output_dir`.
///
/// Files are taken in directory-listing order (not guaranteed stable across
/// platforms) and filtered to those whose extension matches the configured
/// extension case-sensitively. Output files keep the source filename and
/// silently overwrite existing ones. `output_dir` and its parents are
/// created if missing; an existing directory is fine.
///
/// A per-file failure (unreadable input, silent signal, write error) is
/// logged and recorded in the report, and the batch moves on to the next
/// file. Only directory-level failures (listing or creating directories)
/// abort the run.
pub fn normalize_directory(
    input_dir: &Path,
    output_dir: &Path,
    config: &NormalizeConfig,
) -> AudioResult<BatchReport> {
    fs::create_dir_all(output_dir).map_err(|source| AudioError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let entries = fs::read_dir(input_dir).map_err(|source| AudioError::Io {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport::default();

    for entry in entries {
        let entry = entry.map_err(|source| AudioError::Io {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if !path.is_file() || !has_extension(&path, &config.extension) {
            log::debug!("skipping non-audio entry {}", path.display());
            continue;
        }

        // file_name is present for every read_dir entry
        let output = output_dir.join(path.file_name().unwrap_or_default());

        match normalize_file(&path, &output, config) {
            Ok(()) => {
                log::debug!("normalized {} -> {}", path.display(), output.display());
                report.written.push(output);
            }
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                report.failed.push((path, e));
            }
        }
    }

    log::info!(
        "normalized {} file(s) from {} into {} ({} failed)",
        report.written.len(),
        input_dir.display(),
        output_dir.display(),
        report.failed.len()
    );

    Ok(report)
}

/// Normalize a set of labeled directories under a common root.
///
/// For each label the input is `data_root/<label>` and the output
/// `data_root/normalized_<label>`. Returns one report per label, in order.
pub fn normalize_labeled_dirs(
    data_root: &Path,
    labels: &[&str],
    config: &NormalizeConfig,
) -> AudioResult<Vec<BatchReport>> {
    labels
        .iter()
        .map(|label| {
            let input_dir = data_root.join(label);
            let output_dir = data_root.join(format!("normalized_{}", label));
            normalize_directory(&input_dir, &output_dir, config)
        })
        .collect()
}

/// Case-sensitive extension match against the configured extension
/// (stored without the leading dot).
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
