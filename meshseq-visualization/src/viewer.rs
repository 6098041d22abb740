//! Interactive sequence viewer
//!
//! The winit event loop owns the window, the renderer and the session. Mouse
//! input not taken by the control panel drives the camera; panel actions are
//! executed by the session against the renderer, the disk and the native file
//! dialog.

use crate::{
    camera::Camera, config::ViewerConfig, dialog::NativeFilePicker, gui::GuiLayer,
    panel::ControlPanel, renderer::MeshRenderer,
};
use log::{error, info, warn};
use meshseq_core::{ActionOutcome, Error, Point3, Result, Session, UiAction};
use meshseq_io::DiskStorage;
use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::Key,
    window::WindowBuilder,
};

/// Mouse state for camera control
#[derive(Debug, Default)]
struct PointerState {
    orbiting: bool,
    panning: bool,
    last_position: Option<PhysicalPosition<f64>>,
}

/// Window showing one mesh sequence with its control panel
pub struct SequenceViewer {
    config: ViewerConfig,
    session: Session,
    storage: DiskStorage,
    picker: NativeFilePicker,
}

impl SequenceViewer {
    /// Create a viewer around `session`, which may already hold a sequence
    pub fn new(config: ViewerConfig, session: Session) -> Self {
        let picker = match session.sequence() {
            Some(sequence) => NativeFilePicker::new().with_directory(sequence.folder()),
            None => NativeFilePicker::new(),
        };
        Self {
            config,
            session,
            storage: DiskStorage::new(),
            picker,
        }
    }

    /// Open the window and run until it is closed or a fatal error occurs
    pub fn run(self) -> Result<()> {
        let Self {
            config,
            mut session,
            storage,
            mut picker,
        } = self;

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Render(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(window_title(&config, &session))
                .with_inner_size(LogicalSize::new(config.width, config.height))
                .build(&event_loop)
                .map_err(|e| Error::Render(format!("Failed to create window: {}", e)))?,
        );

        let camera = Camera::new(Point3::origin(), 5.0, config.up_axis, config.fov, 1.0);
        let mut renderer = pollster::block_on(MeshRenderer::new(window.clone(), config.render.clone(), camera))?;
        let mut gui = GuiLayer::new(&window, renderer.device(), renderer.surface_format());
        let mut panel = ControlPanel::new(config.panel_width);

        if session.is_loaded() {
            session.update_view(&mut renderer, session.current_frame())?;
            renderer.fit_camera();
        }

        info!("Viewer initialized");

        let mut pointer = PointerState::default();
        let mut fatal: Option<Error> = None;

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, window_id } = event else {
                    return;
                };
                if window_id != window.id() {
                    return;
                }

                let response = gui.on_window_event(&window, &event);
                if response.repaint {
                    window.request_redraw();
                }

                match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        window.request_redraw();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let pressed = state == ElementState::Pressed && !response.consumed;
                        match button {
                            MouseButton::Left => pointer.orbiting = pressed,
                            MouseButton::Right => pointer.panning = pressed,
                            _ => {}
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some(last) = pointer.last_position {
                            let dx = (position.x - last.x) as f32;
                            let dy = (position.y - last.y) as f32;
                            if pointer.orbiting {
                                renderer.camera.orbit(dx * config.orbit_speed, dy * config.orbit_speed);
                                window.request_redraw();
                            } else if pointer.panning {
                                renderer.camera.pan(dx * config.pan_speed, dy * config.pan_speed);
                                window.request_redraw();
                            }
                        }
                        pointer.last_position = Some(position);
                    }
                    WindowEvent::MouseWheel { delta, .. } if !response.consumed => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        renderer.camera.zoom(scroll * config.zoom_speed);
                        window.request_redraw();
                    }
                    WindowEvent::KeyboardInput { event, .. }
                        if !response.consumed && event.state == ElementState::Pressed =>
                    {
                        if let Key::Character(c) = &event.logical_key {
                            if c.eq_ignore_ascii_case("r") {
                                renderer.camera.reset();
                                window.request_redraw();
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let mut actions = Vec::new();
                        let frame = gui.run(&window, |ctx| {
                            actions = panel.show(ctx, &mut session);
                        });

                        for action in actions {
                            let result = session.apply(action, &mut renderer, &storage, &mut picker);
                            match handle_outcome(action, result, &mut panel) {
                                Ok(reloaded) => {
                                    if reloaded {
                                        renderer.fit_camera();
                                        window.set_title(&window_title(&config, &session));
                                    }
                                    window.request_redraw();
                                }
                                Err(e) => {
                                    error!("{}", e);
                                    fatal = Some(e);
                                    target.exit();
                                    return;
                                }
                            }
                        }

                        let (width, height) = renderer.size();
                        let result = renderer.render_frame(|device, queue, encoder, view| {
                            gui.paint(device, queue, encoder, view, [width, height], frame)
                        });
                        if let Err(e) = result {
                            error!("Render error: {}", e);
                            fatal = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Render(format!("Event loop failed: {}", e)))?;

        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Report an action result on the panel. Returns whether a new sequence was
/// loaded; fatal errors are passed on.
fn handle_outcome(action: UiAction, result: Result<ActionOutcome>, panel: &mut ControlPanel) -> Result<bool> {
    match result {
        Ok(ActionOutcome::Loaded { frames }) => {
            panel.set_status(format!("loaded {} frames", frames));
            Ok(true)
        }
        Ok(ActionOutcome::Exported { folder, files }) => {
            info!("exported {} files to {}", files, folder.display());
            panel.set_status(format!("saved {} files", files));
            Ok(false)
        }
        Ok(ActionOutcome::Cancelled | ActionOutcome::FrameShown { .. } | ActionOutcome::Ignored) => Ok(false),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("{:?} failed: {}", action, e);
            panel.set_status(e.to_string());
            Ok(false)
        }
    }
}

fn window_title(config: &ViewerConfig, session: &Session) -> String {
    match session.sequence() {
        Some(sequence) => format!("{} - {}", config.title, sequence.pattern()),
        None => config.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_error_is_reported_not_fatal() {
        let mut panel = ControlPanel::default();
        let err = Error::Parse {
            path: PathBuf::from("mesh1.obj"),
            message: "bad face".to_string(),
        };
        let reloaded = handle_outcome(UiAction::Load, Err(err), &mut panel).unwrap();
        assert!(!reloaded);
        assert!(panel.status().unwrap().contains("mesh1.obj"));
    }

    #[test]
    fn test_fatal_errors_pass_through() {
        let mut panel = ControlPanel::default();
        let err = Error::NoFramesFound {
            pattern: "mesh<0..>.obj".to_string(),
        };
        assert!(handle_outcome(UiAction::Load, Err(err), &mut panel).is_err());
    }

    #[test]
    fn test_load_and_export_outcomes() {
        let mut panel = ControlPanel::default();
        let loaded = handle_outcome(UiAction::Load, Ok(ActionOutcome::Loaded { frames: 4 }), &mut panel);
        assert!(loaded.unwrap());

        let exported = handle_outcome(
            UiAction::ExportMeshes,
            Ok(ActionOutcome::Exported {
                folder: PathBuf::from("out"),
                files: 4,
            }),
            &mut panel,
        );
        assert!(!exported.unwrap());
        assert_eq!(panel.status(), Some("saved 4 files"));
        assert!(!handle_outcome(UiAction::Load, Ok(ActionOutcome::Cancelled), &mut panel).unwrap());
    }

    #[test]
    fn test_window_title() {
        let config = ViewerConfig::default();
        assert_eq!(window_title(&config, &Session::default()), "meshseq");
    }
}
