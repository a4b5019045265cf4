//! Persisted naming style.
//!
//! The legacy tool kept its naming style as process-wide state. Here it is a
//! single slot behind [`NameStyleStore`], read once when a
//! [`Dispatcher`](crate::Dispatcher) is built and written by `set_name_type`.
//!
//! Concurrent invocations race on the slot: each reads at start and the last
//! rename wins. Nothing here orders them.

use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::name_style::NameStyle;

/// Well-known location of the persisted style. `/run` is cleared on reboot,
/// which matches the legacy tool.
pub const DEFAULT_STATE_FILE: &str = "/run/vconfig_name_type";

/// Storage for the current [`NameStyle`].
pub trait NameStyleStore {
    /// Current style; falls back to the default when nothing usable is stored.
    fn load(&self) -> NameStyle;

    /// Replace the stored style.
    fn save(&self, style: NameStyle) -> Result<()>;
}

impl<T: NameStyleStore + ?Sized> NameStyleStore for &T {
    fn load(&self) -> NameStyle {
        (**self).load()
    }

    fn save(&self, style: NameStyle) -> Result<()> {
        (**self).save(style)
    }
}

/// Store backed by a small text file holding the style name.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `data` next to the target, then rename over it.
    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp = self.path.with_file_name(tmp_name);

        let written = (|| {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(data)?;
            f.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

impl NameStyleStore for FileStore {
    fn load(&self) -> NameStyle {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return NameStyle::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cannot read name-type, using default"
                );
                return NameStyle::default();
            }
        };

        match content.trim().parse() {
            Ok(style) => style,
            Err(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    content = %content.trim(),
                    "unrecognized name-type, using default"
                );
                NameStyle::default()
            }
        }
    }

    fn save(&self, style: NameStyle) -> Result<()> {
        self.write_atomic(style.as_str().as_bytes())
            .map_err(|source| Error::StateStore {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), %style, "saved name-type");
        Ok(())
    }
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    style: Cell<NameStyle>,
}

impl MemoryStore {
    /// Store holding `style`.
    pub fn new(style: NameStyle) -> Self {
        Self {
            style: Cell::new(style),
        }
    }
}

impl NameStyleStore for MemoryStore {
    fn load(&self) -> NameStyle {
        self.style.get()
    }

    fn save(&self, style: NameStyle) -> Result<()> {
        self.style.set(style);
        Ok(())
    }
}
