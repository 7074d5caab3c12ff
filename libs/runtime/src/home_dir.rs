//! Resolution of the server home directory.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("platform home directory is unavailable")]
    HomeUnavailable,
    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve `configured` into an absolute path.
///
/// `None` falls back to `<platform home>/<default_subdir>`; on Windows the
/// platform home is `%APPDATA%`. A leading `~` is expanded and relative paths
/// are anchored at the current working directory.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let resolved = match configured {
        Some(raw) => expand(&raw)?,
        None => platform_home()?.join(default_subdir),
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .map_err(|source| HomeDirError::Create {
                path: resolved.clone(),
                source,
            })?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute).map_err(|source| HomeDirError::Create {
            path: absolute.clone(),
            source,
        })?;
    }
    Ok(absolute)
}

fn platform_home() -> Result<PathBuf, HomeDirError> {
    #[cfg(target_os = "windows")]
    let home = dirs::config_dir();
    #[cfg(not(target_os = "windows"))]
    let home = dirs::home_dir();
    home.ok_or(HomeDirError::HomeUnavailable)
}

fn expand(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_home();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => Ok(platform_home()?.join(rest)),
        None => Ok(Path::new(raw).to_path_buf()),
    }
}
