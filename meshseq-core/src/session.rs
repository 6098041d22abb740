//! Viewer session: the loaded sequence, the current frame and what the
//! scene currently shows.
//!
//! Every operation the control panel offers is a [`UiAction`] executed by
//! [`Session::apply`]. The session reaches the outside world only through the
//! capability traits, so the whole load / scrub / export cycle runs in tests
//! without a window.

use crate::{
    config::SessionConfig,
    frame::Frame,
    naming::{numbered_output, SequencePattern},
    sequence::Sequence,
    traits::{FilePicker, MeshStorage, RenderSink},
    Error, Result,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Requests coming from the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Pick a frame file and load its sequence
    Load,
    /// Show the given frame (wrapped modulo the frame count)
    SetFrame(usize),
    /// Capture every frame to a numbered PNG
    ExportScreenshots,
    /// Write every frame to a numbered OBJ
    ExportMeshes,
}

/// What an applied action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Loaded { frames: usize },
    Cancelled,
    FrameShown { frame: usize },
    Exported { folder: PathBuf, files: usize },
    Ignored,
}

/// How the last view update reached the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    Registered,
    MovedVertices,
}

/// Session state
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    sequence: Option<Sequence>,
    current_frame: usize,
    first_run: bool,
    displayed: Option<usize>,
}

impl Session {
    /// Create an unloaded session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sequence: None,
            current_frame: 0,
            first_run: true,
            displayed: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// File number the next load starts probing at
    pub fn start_id(&self) -> u32 {
        self.config.start_id
    }

    /// Takes effect on the next load
    pub fn set_start_id(&mut self, start_id: u32) {
        self.config.start_id = start_id;
    }

    pub fn start_id_mut(&mut self) -> &mut u32 {
        &mut self.config.start_id
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.sequence.is_some()
    }

    /// Frame count, zero while unloaded
    pub fn num_frames(&self) -> usize {
        self.sequence.as_ref().map_or(0, Sequence::len)
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Frame the scene shows, if any
    pub fn displayed_frame(&self) -> Option<usize> {
        self.displayed
    }

    /// Load the sequence `path` belongs to.
    ///
    /// The previous sequence stays in place unless every frame reads.
    pub fn load(&mut self, path: &Path, storage: &dyn MeshStorage) -> Result<usize> {
        info!("load path: {}", path.display());

        let pattern = SequencePattern::from_frame_path(path, self.config.start_id);
        info!("prefix: {}", pattern.prefix().to_string_lossy());

        let num_frames = pattern.count_frames(storage);
        info!("total frames: {}", num_frames);
        if num_frames == 0 {
            return Err(Error::NoFramesFound {
                pattern: pattern.to_string(),
            });
        }

        let frames = (0..num_frames)
            .map(|i| {
                debug!("load frame: {}", i);
                storage.read_frame(&pattern.frame_path(i))
            })
            .collect::<Result<Vec<Frame>>>()?;
        info!("load mesh finished!");

        let sequence = Sequence::new(pattern, frames)?;
        if !sequence.is_same_mesh() {
            info!("frames 0 and 1 differ in topology; every frame change re-registers the mesh");
        }

        self.sequence = Some(sequence);
        self.current_frame = 0;
        self.first_run = true;
        self.displayed = None;

        Ok(num_frames)
    }

    /// Push frame `frame_id` (wrapped) into the scene.
    ///
    /// The first update after a load and every update of a sequence whose
    /// first two frames differ register the mesh anew. Otherwise only vertex
    /// positions move, unless the target frame's topology differs from the
    /// displayed one.
    pub fn update_view(&mut self, sink: &mut dyn RenderSink, frame_id: usize) -> Result<ViewUpdate> {
        let sequence = self.sequence.as_ref().ok_or(Error::NotLoaded)?;
        let index = sequence.wrap(frame_id);
        let frame = sequence.frame(index);

        let topology_matches = self
            .displayed
            .map(|shown| sequence.frame(shown).same_topology(frame))
            .unwrap_or(false);

        let update = if self.first_run || !sequence.is_same_mesh() || !topology_matches {
            if !self.first_run && sequence.is_same_mesh() {
                warn!("frame {} changes topology; registering it anew", index);
            }
            sink.register_mesh(&self.config.mesh_name, &frame.vertices, &frame.faces)?;
            ViewUpdate::Registered
        } else {
            sink.update_vertex_positions(&self.config.mesh_name, &frame.vertices)?;
            ViewUpdate::MovedVertices
        };

        self.first_run = false;
        self.displayed = Some(index);
        Ok(update)
    }

    /// Slider entry point: wrap `value`, make it current and show it
    pub fn set_current_frame(&mut self, sink: &mut dyn RenderSink, value: usize) -> Result<usize> {
        let sequence = self.sequence.as_ref().ok_or(Error::NotLoaded)?;
        self.current_frame = sequence.wrap(value);
        self.update_view(sink, self.current_frame)?;
        Ok(self.current_frame)
    }

    /// Folder an export of the given kind writes to
    pub fn export_folder(&self, dir_name: &str) -> Result<PathBuf> {
        let sequence = self.sequence.as_ref().ok_or(Error::NotLoaded)?;
        Ok(sequence.folder().join(dir_name))
    }

    /// Capture every frame as `<folder>/polyimags/output_<i>.png`.
    ///
    /// The current frame follows the loop, so the last frame stays shown.
    pub fn export_screenshots(
        &mut self,
        sink: &mut dyn RenderSink,
        storage: &dyn MeshStorage,
    ) -> Result<PathBuf> {
        let layout = self.config.export.clone();
        let folder = self.export_folder(&layout.screenshot_dir)?;
        info!("save folder: {}", folder.display());
        storage.ensure_dir(&folder)?;

        for i in 0..self.num_frames() {
            self.current_frame = i;
            self.update_view(sink, i)?;
            let path = numbered_output(&folder, &layout.screenshot_stem, i, &layout.screenshot_extension);
            sink.screenshot(&path)?;
            debug!("saved screenshot {}", path.display());
        }

        Ok(folder)
    }

    /// Write every frame as `<folder>/meshSequence/mesh_<i>.obj`
    pub fn export_meshes(&self, storage: &dyn MeshStorage) -> Result<PathBuf> {
        let sequence = self.sequence.as_ref().ok_or(Error::NotLoaded)?;
        let layout = &self.config.export;
        let folder = self.export_folder(&layout.mesh_dir)?;
        info!("save folder: {}", folder.display());
        storage.ensure_dir(&folder)?;

        for (i, frame) in sequence.iter().enumerate() {
            let path = numbered_output(&folder, &layout.mesh_stem, i, &layout.mesh_extension);
            storage.write_frame(frame, &path)?;
            debug!("saved mesh {}", path.display());
        }

        Ok(folder)
    }

    /// Execute one control panel request
    pub fn apply(
        &mut self,
        action: UiAction,
        sink: &mut dyn RenderSink,
        storage: &dyn MeshStorage,
        picker: &mut dyn FilePicker,
    ) -> Result<ActionOutcome> {
        match action {
            UiAction::Load => {
                let Some(path) = picker.pick_frame_file() else {
                    info!("load cancelled");
                    return Ok(ActionOutcome::Cancelled);
                };
                let frames = self.load(&path, storage)?;
                self.update_view(sink, self.current_frame)?;
                Ok(ActionOutcome::Loaded { frames })
            }
            UiAction::SetFrame(value) => {
                if !self.is_loaded() {
                    return Ok(ActionOutcome::Ignored);
                }
                let frame = self.set_current_frame(sink, value)?;
                Ok(ActionOutcome::FrameShown { frame })
            }
            UiAction::ExportScreenshots => {
                if !self.is_loaded() {
                    return Ok(ActionOutcome::Ignored);
                }
                let folder = self.export_screenshots(sink, storage)?;
                Ok(ActionOutcome::Exported { folder, files: self.num_frames() })
            }
            UiAction::ExportMeshes => {
                if !self.is_loaded() {
                    return Ok(ActionOutcome::Ignored);
                }
                let folder = self.export_meshes(storage)?;
                Ok(ActionOutcome::Exported { folder, files: self.num_frames() })
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
