use crate::error::{BlueprintError, Result};
use crate::model::Blueprint;
use crate::serialization::{from_yaml, to_yaml};
use crate::validate::validate_blueprint;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// File name the platform looks for at the repository root.
pub const RENDER_YAML: &str = "render.yaml";

/// Suffix appended to a manifest's path when backing it up.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Validates `blueprint` and writes it to `path` as YAML, creating parent
/// directories as needed.
///
/// # Errors
/// [`BlueprintError::Invalid`] if validation finds defects (nothing is
/// written), otherwise any serialization or I/O failure.
pub fn write_to_file(blueprint: &Blueprint, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let defects = validate_blueprint(Some(blueprint));
    if !defects.is_empty() {
        return Err(BlueprintError::Invalid { defects });
    }

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| BlueprintError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let yaml = to_yaml(blueprint)?;
    fs::write(path, yaml).map_err(|source| BlueprintError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote blueprint to {}", path.display());
    Ok(())
}

/// Writes `dir/render.yaml`.
pub fn write_render_yaml_to(blueprint: &Blueprint, dir: impl AsRef<Path>) -> Result<()> {
    write_to_file(blueprint, dir.as_ref().join(RENDER_YAML))
}

/// Writes `render.yaml` in the current directory.
pub fn write_render_yaml(blueprint: &Blueprint) -> Result<()> {
    write_render_yaml_to(blueprint, ".")
}

/// Like [`write_to_file`], but first copies an existing file at `path` to
/// `path` + [`BACKUP_SUFFIX`].
///
/// # Errors
/// [`BlueprintError::Backup`] if the existing file cannot be copied; the
/// original is left untouched in that case.
pub fn write_with_backup(blueprint: &Blueprint, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup).map_err(|source| BlueprintError::Backup {
            path: backup.clone(),
            source,
        })?;
        info!("backed up {} to {}", path.display(), backup.display());
    }
    write_to_file(blueprint, path)
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_os_string();
    backup.push(BACKUP_SUFFIX);
    PathBuf::from(backup)
}

/// Reads and parses a manifest.
///
/// # Errors
/// [`BlueprintError::ReadFile`] if the file cannot be read, or any error
/// from [`from_yaml`].
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Blueprint> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| BlueprintError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading blueprint from {}", path.display());
    from_yaml(&source)
}

/// Reads `dir/render.yaml`.
pub fn load_render_yaml_from(dir: impl AsRef<Path>) -> Result<Blueprint> {
    load_from_file(dir.as_ref().join(RENDER_YAML))
}

/// Reads `render.yaml` from the current directory.
pub fn load_render_yaml() -> Result<Blueprint> {
    load_render_yaml_from(".")
}
