//! Frame store of a loaded mesh sequence

use crate::{frame::Frame, naming::SequencePattern, Error, Result};
use std::path::PathBuf;

/// All frames of one sequence, in file-number order
#[derive(Debug, Clone)]
pub struct Sequence {
    pattern: SequencePattern,
    frames: Vec<Frame>,
    same_mesh: bool,
}

impl Sequence {
    /// Build a sequence from its frames. Fails on an empty frame list.
    ///
    /// `same_mesh` holds when frames 0 and 1 have identical face lists,
    /// whatever their vertex counts; the view updater re-checks full
    /// topology per frame before updating in place.
    pub fn new(pattern: SequencePattern, frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::NoFramesFound {
                pattern: pattern.to_string(),
            });
        }

        let same_mesh = match (frames.first(), frames.get(1)) {
            (Some(first), Some(second)) => first.faces == second.faces,
            _ => true,
        };

        Ok(Self {
            pattern,
            frames,
            same_mesh,
        })
    }

    pub fn pattern(&self) -> &SequencePattern {
        &self.pattern
    }

    /// Folder the frames live in; exports go to sub-folders of it
    pub fn folder(&self) -> PathBuf {
        self.pattern.folder_path()
    }

    /// Number of frames, always at least one
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether frames 0 and 1 have identical faces
    pub fn is_same_mesh(&self) -> bool {
        self.same_mesh
    }

    /// Wrap any index into `[0, len)`
    pub fn wrap(&self, index: usize) -> usize {
        index % self.frames.len()
    }

    /// Frame at `index`, wrapped
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[self.wrap(index)]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}
