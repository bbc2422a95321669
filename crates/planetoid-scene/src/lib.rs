//! Scene state for Planetoid: uniform tables shared between the surface
//! shaders, the pivot-based scene graph, world assembly and the per-frame
//! session update.

pub mod clock;
pub mod graph;
pub mod orbit;
pub mod session;
pub mod stars;
pub mod uniforms;
pub mod world;

pub use clock::SessionClock;
pub use graph::{MeshKind, Node, NodeId, NodeKind, SceneGraph, Transform};
pub use orbit::MoonOrbit;
pub use session::{Session, orbit_settings};
pub use stars::scatter_stars;
pub use uniforms::{
    Surface, SurfaceUniforms, UniformError, UniformKind, UniformLayout, UniformTable,
    UniformValue,
};
pub use world::{World, assemble};
