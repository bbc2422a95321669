//! The egui control panel.

use planetoid_scene::SurfaceUniforms;
use tracing::{debug, warn};

use crate::controls::{self, ControlChange, ControlId, ControlValue};

/// Widget state for every control, seeded once from the uniforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    values: Vec<(ControlId, ControlValue)>,
}

impl ControlPanel {
    pub fn from_uniforms(uniforms: &SurfaceUniforms) -> Self {
        let values = ControlId::ALL
            .iter()
            .filter_map(|&id| match id.read(uniforms) {
                Some(value) => Some((id, value)),
                None => {
                    warn!(control = ?id, "No uniform behind control, leaving it out");
                    None
                }
            })
            .collect();
        Self { values }
    }

    pub fn value(&self, id: ControlId) -> Option<ControlValue> {
        self.values.iter().find(|(c, _)| *c == id).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Draw the panel as a floating window. Returns what the user changed
    /// this frame.
    pub fn show(&mut self, ctx: &egui::Context) -> Vec<ControlChange> {
        let mut changes = Vec::new();
        egui::Window::new("Controls")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| changes = self.ui(ui));
        changes
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Vec<ControlChange> {
        let mut changes = Vec::new();
        for folder in ControlId::FOLDERS {
            egui::CollapsingHeader::new(folder)
                .default_open(true)
                .show(ui, |ui| {
                    for (id, value) in self.values.iter_mut().filter(|(id, _)| id.folder() == folder) {
                        if control_widget(ui, *id, value) {
                            changes.push(ControlChange {
                                id: *id,
                                value: *value,
                            });
                        }
                    }
                });
        }
        changes
    }
}

fn control_widget(ui: &mut egui::Ui, id: ControlId, value: &mut ControlValue) -> bool {
    match (value, id.slider()) {
        (ControlValue::Scalar(v), Some(spec)) => {
            let response = ui.add(
                egui::Slider::new(v, spec.min..=spec.max)
                    .step_by(f64::from(spec.step))
                    .text(id.label()),
            );
            if response.changed() {
                *v = spec.constrain(*v);
                return true;
            }
            false
        }
        (ControlValue::Scalar(v), None) => ui
            .add(egui::DragValue::new(v).prefix(format!("{}: ", id.label())))
            .changed(),
        (ControlValue::Color(rgb), _) => {
            ui.horizontal(|ui| {
                let changed = ui.color_edit_button_srgb(rgb).changed();
                ui.label(id.label());
                changed
            })
            .inner
        }
    }
}

/// Push panel changes into the uniform tables. Failures are logged and the
/// rest of the batch still applies.
pub fn apply_changes(changes: &[ControlChange], uniforms: &mut SurfaceUniforms) {
    for change in changes {
        match controls::apply(*change, uniforms) {
            Ok(()) => debug!(control = ?change.id, value = ?change.value, "Uniform updated"),
            Err(e) => warn!(control = ?change.id, "Control change rejected: {e}"),
        }
    }
}
