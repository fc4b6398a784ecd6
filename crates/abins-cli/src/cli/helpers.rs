use super::CliError;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub(super) fn current_working_dir() -> Result<PathBuf, CliError> {
    let working_dir =
        std::env::current_dir().context("failed to read current working directory")?;
    Ok(working_dir)
}

pub(super) fn resolve_cli_path(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
