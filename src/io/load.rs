//! Log loader.

use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default inputs, resolved relative to the log directory.
pub const DEFAULT_LOGS: [&str; 2] = ["code.log", "wikipedia.log"];

/// Environment variable naming the default log directory.
pub const LOG_DIR_ENV: &str = "CQ_LOG_DIR";

/// Read a whole log file into memory.
pub fn load_log(path: &Path) -> Result<String, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read log '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "Loaded log");
    Ok(text)
}

/// Resolve the directory holding the default logs.
///
/// Priority: explicit `--dir` > `CQ_LOG_DIR` (environment or `.env`) > the
/// directory of the `cq` executable, if it holds a default log > current directory.
pub fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    dotenvy::dotenv().ok();
    if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir.trim());
        }
    }
    let program_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    fallback_log_dir(program_dir.as_deref())
}

/// The program directory when it contains any default log, else `.`.
fn fallback_log_dir(program_dir: Option<&Path>) -> PathBuf {
    match program_dir {
        Some(dir) if DEFAULT_LOGS.iter().any(|name| dir.join(name).is_file()) => {
            tracing::debug!(dir = %dir.display(), "Using default logs next to the executable");
            dir.to_path_buf()
        }
        _ => PathBuf::from("."),
    }
}

/// Log paths to process: explicit paths win, otherwise the defaults under `dir`.
pub fn resolve_logs(explicit: &[PathBuf], dir: &Path) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    DEFAULT_LOGS.iter().map(|name| dir.join(name)).collect()
}
