//! Control panel drawn with egui
//!
//! The panel reads the session and edits the start id in place; everything
//! else it wants done comes back as [`UiAction`]s for the session to run.

use meshseq_core::{Session, UiAction};

/// Left-hand control panel
#[derive(Debug, Clone)]
pub struct ControlPanel {
    width: f32,
    options_open: bool,
    status: Option<String>,
}

impl ControlPanel {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            options_open: true,
            status: None,
        }
    }

    /// Whether the frame options header is expanded
    pub fn options_open(&self) -> bool {
        self.options_open
    }

    pub fn set_options_open(&mut self, open: bool) {
        self.options_open = open;
    }

    /// Message shown under the controls until replaced
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Draw the panel for one GUI frame and collect the requested actions
    pub fn show(&mut self, ctx: &egui::Context, session: &mut Session) -> Vec<UiAction> {
        let mut actions = Vec::new();

        egui::SidePanel::left("meshseq_controls")
            .resizable(false)
            .exact_width(self.width)
            .show(ctx, |ui| {
                if ui.button("load objs").clicked() {
                    actions.push(UiAction::Load);
                }

                ui.label("start frame");
                ui.add(egui::DragValue::new(session.start_id_mut()).speed(1.0));

                let options = egui::CollapsingHeader::new("Frame Visualization Options")
                    .open(Some(self.options_open))
                    .show(ui, |ui| {
                        let last = session.num_frames().saturating_sub(1);
                        let mut frame = session.current_frame();
                        ui.label("current frame");
                        let slider = ui.add_enabled(
                            session.is_loaded(),
                            egui::Slider::new(&mut frame, 0..=last),
                        );
                        if slider.changed() {
                            actions.push(UiAction::SetFrame(frame));
                        }
                    });
                if options.header_response.clicked() {
                    self.options_open = !self.options_open;
                }

                // exports stay reachable with the options collapsed
                if ui.button("output images").clicked() {
                    actions.push(UiAction::ExportScreenshots);
                }
                if ui.button("output meshes").clicked() {
                    actions.push(UiAction::ExportMeshes);
                }

                ui.separator();
                ui.label(summary(session));
                if let Some(status) = &self.status {
                    ui.label(status.as_str());
                }
            });

        actions
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// One-line description of what is loaded
pub fn summary(session: &Session) -> String {
    match session.sequence() {
        Some(sequence) => format!(
            "{} / {} frames",
            session.current_frame() + 1,
            sequence.len()
        ),
        None => "no sequence".to_string(),
    }
}
