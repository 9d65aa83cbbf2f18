//! CSV output of per-vertex metric values.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::error::VeracityError;

use super::{Metric, MetricDistribution};

/// Returns the seed and synthetic output paths for `metric` under `dir`.
pub(crate) fn output_paths(dir: &Path, metric: Metric) -> [PathBuf; 2] {
    [
        dir.join(format!("{}_seed.csv", metric.as_str())),
        dir.join(format!("{}_synthetic.csv", metric.as_str())),
    ]
}

/// Fails when any output exists and `overwrite` is not set.
pub(crate) fn ensure_writable(paths: &[PathBuf], overwrite: bool) -> Result<(), VeracityError> {
    if overwrite {
        return Ok(());
    }
    match paths.iter().find(|path| path.exists()) {
        Some(path) => Err(VeracityError::OutputExists { path: path.clone() }),
        None => Ok(()),
    }
}

/// Hidden sibling of `path` that outputs are written to before the rename.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Writes every distribution to its staging path, then renames them all into
/// place. Nothing is left at the output paths when a write fails.
pub(crate) fn write_distributions(
    outputs: [(&Path, &MetricDistribution); 2],
) -> Result<(), VeracityError> {
    let staged = outputs.map(|(path, _)| staging_path(path));
    let written = outputs
        .iter()
        .zip(&staged)
        .try_for_each(|((path, distribution), staging)| {
            write_csv(staging, distribution).map_err(|error| io_error(path, &error))
        });
    if let Err(error) = written {
        discard(&staged);
        return Err(error);
    }
    for ((path, _), staging) in outputs.iter().zip(&staged) {
        if let Err(error) = fs::rename(staging, path) {
            discard(&staged);
            return Err(io_error(path, &error));
        }
    }
    Ok(())
}

fn write_csv(path: &Path, distribution: &MetricDistribution) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "vertex,value")?;
    for (vertex, value) in distribution.values() {
        writeln!(writer, "{vertex},{value}")?;
    }
    writer.flush()
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        // Missing files were never created or were already renamed.
        let _ = fs::remove_file(path);
    }
}

fn io_error(path: &Path, error: &io::Error) -> VeracityError {
    VeracityError::Io {
        path: path.to_path_buf(),
        message: Arc::from(error.to_string()),
    }
}
