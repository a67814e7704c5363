use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use transcript_logging::transcript_debug;

/// Give up looking for a free `name (n).md` after this many attempts.
const MAX_RENAME_ATTEMPTS: u32 = 1_000;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free file name for {0}")]
    NameExhausted(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Saves downloads into one directory. Content goes to a temp file first and
/// is moved into place without replacing anything: an existing `name.md`
/// makes the next save land on `name (1).md`, `name (2).md`, ...
pub struct MarkdownSaver {
    dir: PathBuf,
}

impl MarkdownSaver {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn save(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        for attempt in 0..MAX_RENAME_ATTEMPTS {
            let target = self.dir.join(numbered_name(filename, attempt));
            match tmp.persist_noclobber(&target) {
                Ok(_) => {
                    transcript_debug!("saved {} bytes to {:?}", content.len(), target);
                    return Ok(target);
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    tmp = err.file;
                }
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::NameExhausted(filename.to_string()))
    }
}

fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem} ({attempt}).{ext}"),
        None => format!("{filename} ({attempt})"),
    }
}

#[cfg(test)]
mod tests {
    use super::numbered_name;

    #[test]
    fn numbered_names_keep_extension() {
        assert_eq!(numbered_name("chat.md", 0), "chat.md");
        assert_eq!(numbered_name("chat.md", 2), "chat (2).md");
        assert_eq!(numbered_name("chat", 1), "chat (1)");
    }
}
