//! Control panel for the planet's shader parameters, drawn with egui on top
//! of the scene.

pub mod color;
pub mod controls;
pub mod overlay;
pub mod panel;

pub use color::{normalize_rgb, to_rgb8};
pub use controls::{ControlChange, ControlId, ControlValue, SliderSpec, UniformTarget, apply};
pub use overlay::EguiOverlay;
pub use panel::{ControlPanel, apply_changes};
