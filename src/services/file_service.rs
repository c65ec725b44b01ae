use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, error, warn};
use crate::errors::BlogError;
use crate::types::DirEntry;

/// Filesystem access relative to the posts root
#[derive(Clone)]
pub struct FileService {
    root: PathBuf,
}

impl FileService {
    pub fn new(root: PathBuf) -> Self {
        debug!("Posts root: {:?}", root);
        Self { root }
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Entries of `relative`, sorted byte-wise by name.
    ///
    /// Returned paths stay relative to the root. Entries whose metadata cannot be
    /// read are dropped with a warning.
    pub fn list_directory(&self, relative: &Path) -> Result<Vec<DirEntry>, BlogError> {
        let dir = self.resolve(relative);
        if !dir.is_dir() {
            return Err(if dir.exists() {
                BlogError::InvalidPath
            } else {
                BlogError::NotFound(relative.to_string_lossy().into_owned())
            });
        }

        let read = fs::read_dir(&dir).map_err(|e| {
            error!("Cannot open directory {:?}: {}", dir, e);
            BlogError::Io(e)
        })?;

        let mut entries: Vec<DirEntry> = read
            .filter_map(|entry| {
                let entry = entry
                    .inspect_err(|e| warn!("Unreadable entry in {:?}: {}", dir, e))
                    .ok()?;
                let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
                let name = entry.file_name().to_string_lossy().into_owned();
                Some(DirEntry {
                    path: relative.join(&name),
                    name,
                    is_dir,
                })
            })
            .collect();

        entries.sort_unstable_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        debug!("{:?}: {} entries", relative, entries.len());
        Ok(entries)
    }

    /// Whole file as text; invalid UTF-8 sequences become U+FFFD
    pub fn read_file(&self, relative: &Path) -> Result<String, BlogError> {
        let file = self.resolve(relative);
        if !file.is_file() {
            return Err(BlogError::NotFound(relative.to_string_lossy().into_owned()));
        }
        let bytes = fs::read(&file).map_err(|e| {
            error!("Cannot read {:?}: {}", file, e);
            BlogError::Io(e)
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn file_exists(&self, relative: &Path) -> bool {
        self.resolve(relative).is_file()
    }

    pub fn dir_exists(&self, relative: &Path) -> bool {
        self.resolve(relative).is_dir()
    }
}
