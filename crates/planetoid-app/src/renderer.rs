//! GPU resources for the assembled world and the per-frame draw order.

use glam::{Mat4, Vec3};
use planetoid_config::WorldConfig;
use planetoid_render::{
    BasicDraw, BasicMaterial, BasicUniform, BlendMode, InstanceOffset, MaterialBinding,
    MaterialDesc, MeshBuffer, ShaderLibrary, ShaderMaterial, ShaderSources, SphereGeometry,
    TransformUniform,
};
use planetoid_scene::world::{STAR_COLOR, STAR_SEGMENTS, SUN_COLOR};
use planetoid_scene::{NodeId, Session, Surface, UniformError, World};
use tracing::info;

use crate::error::SceneBuildError;

/// Pipeline settings for each surface.
pub fn material_desc(surface: Surface) -> MaterialDesc {
    let desc = MaterialDesc::opaque(surface.name(), surface.layout().size() as u64);
    match surface {
        Surface::Planet | Surface::Moon => desc,
        Surface::Ocean => desc.with_blend(BlendMode::Alpha),
        Surface::Atmosphere => desc.with_blend(BlendMode::Additive).with_depth_write(false),
    }
}

/// Surfaces in draw order: opaque first, then the shells that blend over them.
pub const DRAW_ORDER: [Surface; 4] = [
    Surface::Planet,
    Surface::Moon,
    Surface::Ocean,
    Surface::Atmosphere,
];

struct SurfaceDraw {
    surface: Surface,
    node: NodeId,
    material: ShaderMaterial,
    binding: MaterialBinding,
}

pub struct SceneRenderer {
    library: ShaderLibrary,
    surfaces: Vec<SurfaceDraw>,
    planet_mesh: MeshBuffer,
    moon_mesh: MeshBuffer,
    star_mesh: MeshBuffer,
    basic: BasicMaterial,
    sun: BasicDraw,
    sun_node: NodeId,
    stars: BasicDraw,
    light_dir: Vec3,
}

impl SceneRenderer {
    /// Compile the surface shaders and upload every mesh of `world`.
    ///
    /// Each surface's uniform layout is checked against its shader text
    /// before any pipeline is created. Pipelines render with `sample_count`
    /// samples, matching the pass's color and depth targets.
    pub fn build(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        sources: &ShaderSources,
        world: &World,
        config: &WorldConfig,
    ) -> Result<Self, SceneBuildError> {
        let mut composed_shaders = Vec::with_capacity(DRAW_ORDER.len());
        for surface in DRAW_ORDER {
            let composed = sources.compose(surface.name())?;
            surface.layout().validate_source(&composed.vertex)?;
            surface.layout().validate_source(&composed.fragment)?;
            composed_shaders.push((surface, composed));
        }

        // WGSL and pipeline validation errors are captured here instead of
        // reaching the device's uncaptured-error handler.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut library = ShaderLibrary::new();
        let mut surfaces = Vec::with_capacity(DRAW_ORDER.len());
        for (surface, composed) in &composed_shaders {
            let compiled = library.compile(device, composed);
            let desc = material_desc(*surface).with_samples(sample_count);
            let material = ShaderMaterial::new(device, &compiled, format, desc);
            let binding = material.create_binding(device);
            surfaces.push(SurfaceDraw {
                surface: *surface,
                node: surface_node(world, *surface),
                material,
                binding,
            });
        }
        let basic = BasicMaterial::new(device, format, sample_count);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(SceneBuildError::Compile(err.to_string()));
        }

        let planet_geometry =
            SphereGeometry::new(config.planet_radius, config.segments, config.rings);
        let moon_geometry = SphereGeometry::new(config.moon_radius, config.segments, config.rings);
        let star_geometry = SphereGeometry::new(config.star_radius, STAR_SEGMENTS, STAR_SEGMENTS);

        let sun = basic.create_draw(device, "sun", &[InstanceOffset::from(Vec3::ZERO)]);
        let star_offsets: Vec<InstanceOffset> = world
            .star_positions()
            .into_iter()
            .map(InstanceOffset::from)
            .collect();
        let stars = basic.create_draw(device, "stars", &star_offsets);

        info!(
            shaders = library.len(),
            planet_triangles = planet_geometry.triangle_count(),
            stars = star_offsets.len(),
            "Scene GPU resources ready"
        );

        Ok(Self {
            library,
            surfaces,
            planet_mesh: MeshBuffer::from_sphere(device, "planet-sphere", &planet_geometry),
            moon_mesh: MeshBuffer::from_sphere(device, "moon-sphere", &moon_geometry),
            star_mesh: MeshBuffer::from_sphere(device, "star-sphere", &star_geometry),
            basic,
            sun,
            sun_node: world.sun,
            stars,
            light_dir: Vec3::from(config.light_position),
        })
    }

    pub fn shader_count(&self) -> usize {
        self.library.len()
    }

    fn mesh_for(&self, surface: Surface) -> &MeshBuffer {
        match surface {
            Surface::Moon => &self.moon_mesh,
            Surface::Planet | Surface::Ocean | Surface::Atmosphere => &self.planet_mesh,
        }
    }

    /// Upload this frame's transforms and uniform tables.
    pub fn prepare(&self, queue: &wgpu::Queue, session: &Session) -> Result<(), UniformError> {
        let Some(world) = session.world.as_ref() else {
            return Ok(());
        };
        let view_proj = session.camera.view_projection_matrix();

        for draw in &self.surfaces {
            let model = world.graph.world_matrix(draw.node);
            draw.binding
                .write_transform(queue, &TransformUniform::new(view_proj, model));
            draw.binding
                .write_uniforms(queue, &session.uniforms.pack(draw.surface)?);
        }

        let sun_model = world.graph.world_matrix(self.sun_node);
        self.sun
            .write(queue, &BasicUniform::unlit(view_proj, sun_model, SUN_COLOR));
        self.stars.write(
            queue,
            &BasicUniform::lambert(view_proj, Mat4::IDENTITY, STAR_COLOR, self.light_dir),
        );
        Ok(())
    }

    /// Record every draw. Opaque surfaces, sun and stars go before the
    /// blended ocean and atmosphere.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let (opaque, blended): (Vec<_>, Vec<_>) = self
            .surfaces
            .iter()
            .partition(|d| !d.material.desc().blend.is_transparent());

        for d in opaque {
            d.material.draw(pass, &d.binding, self.mesh_for(d.surface));
        }
        self.basic.draw(pass, &self.sun, &self.planet_mesh);
        self.basic.draw(pass, &self.stars, &self.star_mesh);
        for d in blended {
            d.material.draw(pass, &d.binding, self.mesh_for(d.surface));
        }
    }
}

fn surface_node(world: &World, surface: Surface) -> NodeId {
    match surface {
        Surface::Planet => world.planet,
        Surface::Ocean => world.ocean,
        Surface::Atmosphere => world.atmosphere,
        Surface::Moon => world.moon,
    }
}
