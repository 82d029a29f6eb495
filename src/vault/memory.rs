use std::{
    collections::{BTreeMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use super::{Entry, File, Folder, ROOT, Vault, extension_of};
use crate::{err, errors::Result};

/// In-memory vault used by tests. Paths are normalized vault paths.
#[derive(Debug, Default)]
pub struct MemoryVault {
    entries: Mutex<BTreeMap<String, Option<i64>>>,
    trashed: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    gate: Mutex<()>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, path: &str) -> &Self {
        self.entries.lock().unwrap().insert(path.to_string(), None);
        self
    }

    pub fn add_file(&self, path: &str, ctime: i64) -> &Self {
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_string(), Some(ctime));
        self
    }

    /// Makes trashing `path` fail.
    pub fn fail_on(&self, path: &str) -> &Self {
        self.failing.lock().unwrap().insert(path.to_string());
        self
    }

    /// Blocks every listing until the guard is dropped.
    pub fn hold(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap()
    }

    pub fn trashed(&self) -> Vec<String> {
        self.trashed.lock().unwrap().clone()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn entry(path: &str, ctime: Option<i64>) -> Entry {
        match ctime {
            Some(ctime) => Entry::File(File {
                path: path.to_string(),
                extension: extension_of(path).to_string(),
                ctime,
            }),
            None => Entry::Folder(Folder {
                path: path.to_string(),
            }),
        }
    }
}

impl Vault for MemoryVault {
    fn resolve(&self, path: &str) -> Option<Entry> {
        if path == ROOT {
            return Some(Self::entry(ROOT, None));
        }
        let entries = self.entries.lock().unwrap();
        entries.get(path).map(|ctime| Self::entry(path, *ctime))
    }

    fn children(&self, folder: &Folder) -> Result<Vec<Entry>> {
        drop(self.gate.lock().unwrap());
        let prefix = if folder.path == ROOT {
            String::new()
        } else {
            format!("{}/", folder.path)
        };
        let entries = self.entries.lock().unwrap();

        Ok(entries
            .iter()
            .filter_map(|(path, ctime)| {
                let rest = path.strip_prefix(&prefix)?;
                (!rest.is_empty() && !rest.contains('/')).then(|| Self::entry(path, *ctime))
            })
            .collect())
    }

    fn trash(&self, file: &File) -> Result<()> {
        if self.failing.lock().unwrap().contains(&file.path) {
            return err!("simulated failure while trashing {}", file.path);
        }
        if self.entries.lock().unwrap().remove(&file.path).is_none() {
            return err!("no such file: {}", file.path);
        }
        self.trashed.lock().unwrap().push(file.path.clone());

        Ok(())
    }
}
