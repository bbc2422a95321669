//! wgpu rendering for Planetoid: GPU context, camera, sphere meshes, shader
//! sources and the shader-backed materials the scene is drawn with.

pub mod basic;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod material;
pub mod mesh;
pub mod msaa;
pub mod pass;
pub mod shader;
pub mod sphere;
pub mod surface;

pub use basic::{BASIC_SHADER_SOURCE, BasicDraw, BasicMaterial, BasicUniform, InstanceOffset};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    pick_sample_count,
};
pub use material::{BlendMode, MaterialBinding, MaterialDesc, ShaderMaterial, TransformUniform};
pub use mesh::MeshBuffer;
pub use msaa::{DEFAULT_SAMPLE_COUNT, MsaaTarget, multisample_state};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use shader::{
    BUNDLE_NAMES, CompiledShader, ComposedShader, NoiseSnippet, ShaderBundle, ShaderError,
    ShaderLibrary, ShaderLoader, ShaderSources, noise_prefix,
};
pub use sphere::{SphereGeometry, SphereVertex};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
