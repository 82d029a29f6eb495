mod fs;
#[cfg(test)]
pub mod memory;

pub use fs::FsVault;

use crate::{err, errors::Error, errors::Result};

/// Path of the vault root after normalization.
pub const ROOT: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub extension: String,
    /// Creation time in epoch milliseconds.
    pub ctime: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Folder(Folder),
    File(File),
}

/// File-tree capability consumed by the sweep.
pub trait Vault: Send + Sync {
    /// Looks up a normalized vault path.
    fn resolve(&self, path: &str) -> Option<Entry>;

    /// Direct children of `folder`, in no particular order.
    fn children(&self, folder: &Folder) -> Result<Vec<Entry>>;

    fn trash(&self, file: &File) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashMode {
    /// Move into the `.trash` folder of the vault.
    Local,
    Permanent,
}

impl std::str::FromStr for TrashMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(TrashMode::Local),
            "permanent" => Ok(TrashMode::Permanent),
            _ => Err(Error::InvalidTrashMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for TrashMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrashMode::Local => write!(f, "local"),
            TrashMode::Permanent => write!(f, "permanent"),
        }
    }
}

/// Normalizes a user supplied vault path.
///
/// Backslashes become slashes, repeated slashes collapse, surrounding
/// slashes and whitespace are dropped and non-breaking spaces become plain
/// spaces. An empty result denotes the vault root.
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace(['\u{00A0}', '\u{202F}'], " ").replace('\\', "/");
    let joined = replaced
        .trim()
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        ROOT.to_string()
    } else {
        joined
    }
}

/// Text after the last dot of the file name, empty when there is none.
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, extension)) => extension,
        None => "",
    }
}

/// Joins a child name onto a normalized folder path.
pub fn child_path(folder: &str, name: &str) -> String {
    if folder == ROOT {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

fn ensure_inside(path: &str) -> Result<()> {
    if path.split('/').any(|part| part == "..") {
        return err!("path escapes the vault: {path}");
    }

    Ok(())
}
