use std::path::{Path, PathBuf};

use thiserror::Error;

/// Numbered variants probed before giving up on a name.
pub const MAX_COLLISION_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollisionError {
    #[error("no free file name for '{stem}.{extension}' after {attempts} attempts")]
    Exhausted {
        stem: String,
        extension: String,
        attempts: u32,
    },
}

/// First free path among `{stem}.{ext}`, `{stem} (1).{ext}`, `{stem} (2).{ext}`, ...
pub fn resolve_collision(dir: &Path, stem: &str, extension: &str) -> Result<PathBuf, CollisionError> {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return Ok(candidate);
    }

    for counter in 1..=MAX_COLLISION_ATTEMPTS {
        let candidate = dir.join(format!("{stem} ({counter}).{extension}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(CollisionError::Exhausted {
        stem: stem.to_string(),
        extension: extension.to_string(),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}
