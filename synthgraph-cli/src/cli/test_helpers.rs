//! Small helpers shared across CLI tests.
//!
//! The tests build throwaway stores and input files; these helpers keep the
//! cases focused on command behaviour.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{Backend, Cli, CliError, Command, ExecutionSummary, ImportArgs, run_cli};

/// Four vertices: a triangle plus a pendant vertex pointing into it.
pub(super) const SEED_EDGES: &str = "# seed\n0 1 scan\n1 2 scan\n2 0 ping\n3 0\n";

pub(super) const SEED_MATRIX: &str = "0.9 0.5\n0.5 0.1\n";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn store_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("store")
}

pub(super) fn cli(backend: Backend, store: &Path, command: Command) -> Cli {
    Cli {
        backend,
        store: store.to_path_buf(),
        command,
    }
}

/// Imports [`SEED_EDGES`] as `seed` into a fresh store under `dir`.
pub(super) fn import_seed(dir: &TempDir, backend: Backend) -> Result<PathBuf, CliError> {
    let path = write_file(dir, "seed.edges", SEED_EDGES)?;
    let store = store_dir(dir);
    let summary = run_cli(cli(
        backend,
        &store,
        Command::Import(ImportArgs {
            path,
            name: "seed".into(),
            label_key: "label".into(),
            overwrite: false,
        }),
    ))?;
    assert!(matches!(
        summary,
        ExecutionSummary::Imported {
            vertices: 4,
            edges: 4,
            ..
        }
    ));
    Ok(store)
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
