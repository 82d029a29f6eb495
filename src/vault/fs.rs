use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use super::{
    Entry, File, Folder, ROOT, TrashMode, Vault, child_path, ensure_inside, extension_of,
};
use crate::errors::{Error, Result};

const TRASH_DIR: &str = ".trash";

/// A vault backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    trash_mode: TrashMode,
}

impl FsVault {
    pub fn open(root: impl Into<PathBuf>, trash_mode: TrashMode) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::VaultRootMissing(root.display().to_string()));
        }

        Ok(Self { root, trash_mode })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &str) -> PathBuf {
        if path == ROOT {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    fn move_to_trash(&self, source: &Path, name: &str) -> Result<PathBuf> {
        let trash_dir = self.root.join(TRASH_DIR);
        fs::create_dir_all(&trash_dir)?;
        let target = available_path(&trash_dir, name);
        fs::rename(source, &target)?;

        Ok(target)
    }
}

impl Vault for FsVault {
    fn resolve(&self, path: &str) -> Option<Entry> {
        if ensure_inside(path).is_err() {
            warn!("Refusing to resolve a path outside of the vault: {path}");
            return None;
        }
        let absolute = self.absolute(path);
        let metadata = fs::metadata(&absolute).ok()?;

        if metadata.is_dir() {
            Some(Entry::Folder(Folder {
                path: path.to_string(),
            }))
        } else if metadata.is_file() {
            Some(Entry::File(File {
                path: path.to_string(),
                extension: extension_of(path).to_string(),
                ctime: creation_millis(&metadata)?,
            }))
        } else {
            None
        }
    }

    fn children(&self, folder: &Folder) -> Result<Vec<Entry>> {
        let mut entries = vec![];
        for entry in fs::read_dir(self.absolute(&folder.path))? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                // 跳过非 UTF-8 文件名
                debug!("Skipping non UTF-8 entry: {}", entry.path().display());
                continue;
            };
            let path = child_path(&folder.path, name);
            let metadata = entry.metadata()?;

            if metadata.is_dir() {
                entries.push(Entry::Folder(Folder { path }));
            } else if metadata.is_file() {
                let Some(ctime) = creation_millis(&metadata) else {
                    warn!("Cannot read the creation time of {path}, skipping");
                    continue;
                };
                entries.push(Entry::File(File {
                    extension: extension_of(&path).to_string(),
                    path,
                    ctime,
                }));
            }
        }

        Ok(entries)
    }

    fn trash(&self, file: &File) -> Result<()> {
        if ensure_inside(&file.path).is_err() {
            return Err(Error::OutsideVault(file.path.clone()));
        }
        let source = self.absolute(&file.path);

        match self.trash_mode {
            // 已在回收站中的文件直接删除
            TrashMode::Local if in_trash(&file.path) => {
                fs::remove_file(&source)?;
                debug!("Removed {} from the trash", file.path);
            }
            TrashMode::Local => {
                let name = file.path.rsplit('/').next().unwrap_or(&file.path);
                let target = self.move_to_trash(&source, name)?;
                debug!("Moved {} to {}", file.path, target.display());
            }
            TrashMode::Permanent => {
                fs::remove_file(&source)?;
                debug!("Removed {}", file.path);
            }
        }

        Ok(())
    }
}

fn in_trash(path: &str) -> bool {
    path.split('/').next() == Some(TRASH_DIR)
}

fn creation_millis(metadata: &fs::Metadata) -> Option<i64> {
    // 部分平台不支持创建时间，退回到修改时间
    let time: SystemTime = metadata.created().or_else(|_| metadata.modified()).ok()?;

    Some(DateTime::<Utc>::from(time).timestamp_millis())
}

/// First free `name`, `stem 1.ext`, `stem 2.ext`, ... inside `dir`.
fn available_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (name, None),
    };

    (1..)
        .map(|n| match extension {
            Some(extension) => dir.join(format!("{stem} {n}.{extension}")),
            None => dir.join(format!("{stem} {n}")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
