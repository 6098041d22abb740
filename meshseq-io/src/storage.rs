//! File-system storage for the session

use crate::{read_frame, write_frame};
use log::info;
use meshseq_core::{Error, Frame, MeshStorage, Result};
use std::fs;
use std::path::Path;

/// [`MeshStorage`] backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStorage;

impl DiskStorage {
    pub fn new() -> Self {
        Self
    }
}

impl MeshStorage for DiskStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return Ok(());
        }
        info!("create directory: {}", path.display());
        fs::create_dir_all(path).map_err(|source| Error::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_frame(&self, path: &Path) -> Result<Frame> {
        read_frame(path)
    }

    fn write_frame(&self, frame: &Frame, path: &Path) -> Result<()> {
        write_frame(frame, path)
    }
}
