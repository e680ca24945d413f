use crate::utils::error::{Result, SetupError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 目前行程能否寫入；以附加模式開啟，不會截斷內容
pub fn is_writable(path: &Path) -> bool {
    fs::OpenOptions::new().append(true).open(path).is_ok()
}

/// Copies `template` to `env_path` when `env_path` does not exist yet.
///
/// Returns `true` when a copy was made. A missing template or a failed copy
/// leaves things as they are.
pub fn copy_env_template(env_path: &Path, template: &Path) -> bool {
    if env_path.exists() {
        return false;
    }

    match fs::copy(template, env_path) {
        Ok(_) => {
            tracing::info!("📄 Created {} from {}", env_path.display(), template.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No env template at {}, skipping", template.display());
            false
        }
        Err(e) => {
            tracing::warn!("⚠️ Could not copy {}: {}", template.display(), e);
            false
        }
    }
}

/// 重新載入 .env，覆蓋行程內既有的值
pub fn load_env_file(env_path: &Path) -> Result<()> {
    dotenvy::from_path_override(env_path).map_err(|e| SetupError::ConfigError {
        message: format!("Failed to load {}: {}", env_path.display(), e),
    })?;
    tracing::debug!("Reloaded environment from {}", env_path.display());
    Ok(())
}

/// Appends the entries missing from the ignore file. Returns `true` if the
/// file was changed.
pub fn append_gitignore_entries(path: &Path, entries: &[String]) -> Result<bool> {
    let contents = fs::read_to_string(path)?;
    let existing: Vec<&str> = contents.lines().map(str::trim).collect();

    let missing: Vec<&str> = entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty() && !existing.contains(e))
        .collect();

    if missing.is_empty() {
        return Ok(false);
    }

    let mut updated = contents.trim_end_matches(['\r', '\n']).to_string();
    if !updated.is_empty() {
        updated.push('\n');
    }
    for entry in &missing {
        updated.push_str(entry);
        updated.push('\n');
    }

    fs::write(path, updated)?;
    tracing::debug!("Added {} to {}", missing.join(", "), path.display());
    Ok(true)
}
