//! Pointer input and orbit-style camera controls.

pub mod mouse;
pub mod orbit_controls;

pub use mouse::MouseState;
pub use orbit_controls::{OrbitControls, OrbitSettings, Spherical};
