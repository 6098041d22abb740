//! Native file dialog for choosing a frame file

use log::debug;
use meshseq_core::{FilePicker, FRAME_EXTENSION};
use std::path::PathBuf;

/// File picker backed by the platform dialog. Each pick starts in the
/// folder of the previous one.
#[derive(Debug, Default, Clone)]
pub struct NativeFilePicker {
    last_dir: Option<PathBuf>,
}

impl NativeFilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the next dialog in `dir`
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.last_dir = Some(dir.into());
        self
    }
}

impl FilePicker for NativeFilePicker {
    fn pick_frame_file(&mut self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Select one frame of the sequence")
            .add_filter("Wavefront OBJ", &[FRAME_EXTENSION]);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }

        let picked = dialog.pick_file();
        if let Some(path) = &picked {
            debug!("picked {}", path.display());
            self.last_dir = path.parent().map(PathBuf::from);
        }
        picked
    }
}
