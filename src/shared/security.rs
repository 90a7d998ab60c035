use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for definition and config files read from disk (1 MB).
pub const MAX_DEFINITION_FILE_SIZE: u64 = 1024 * 1024;

/// Longest accepted application or environment name.
pub const MAX_NAME_LENGTH: usize = 128;

/// Rejects symbolic links before a read or write touches the path.
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Validates that `path` is an existing regular file within the size limit.
///
/// # Errors
/// Returns an error if the path is missing, a symlink, not a regular file,
/// or larger than `max_size` bytes.
pub fn validate_definition_file(path: &Path, max_size: u64) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read metadata for {}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    Ok(())
}

/// Validates a name that will be interpolated into file names and URL paths.
///
/// Accepts ASCII alphanumerics, `-` and `_` only.
pub fn validate_resource_name(value: &str, kind: &str) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", kind);
    }

    if value.len() > MAX_NAME_LENGTH {
        anyhow::bail!(
            "{} is too long ({} characters). Maximum is {}.",
            kind,
            value.len(),
            MAX_NAME_LENGTH
        );
    }

    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        anyhow::bail!("{} '{}' contains invalid character '{}'", kind, value, c);
    }

    Ok(())
}
