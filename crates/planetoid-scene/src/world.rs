//! Builds the planet scene: planet, ocean and atmosphere shells, the sun,
//! the star field and the moon under its orbit pivots.

use glam::Vec3;
use planetoid_config::WorldConfig;
use rand::Rng;
use tracing::info;

use crate::graph::{MeshKind, Node, NodeId, SceneGraph};
use crate::orbit::MoonOrbit;
use crate::stars::scatter_stars;

/// Segments and rings of each star sphere.
pub const STAR_SEGMENTS: u32 = 4;

/// Star tint, 0xffffe6.
pub const STAR_COLOR: [f32; 3] = [1.0, 1.0, 230.0 / 255.0];

pub const SUN_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

#[derive(Debug, Clone)]
pub struct World {
    pub graph: SceneGraph,
    pub planet: NodeId,
    pub ocean: NodeId,
    pub atmosphere: NodeId,
    pub sun: NodeId,
    pub stars: Vec<NodeId>,
    pub moon: NodeId,
    pub moon_orbit: MoonOrbit,
    /// Seed the star field was scattered with.
    pub star_seed: u64,
}

impl World {
    pub fn star_positions(&self) -> Vec<Vec3> {
        self.stars
            .iter()
            .map(|&id| self.graph.world_position(id))
            .collect()
    }
}

/// Assemble the scene graph. `star_seed` overrides `config.star_seed`; with
/// neither set a fresh seed is drawn.
pub fn assemble(config: &WorldConfig, star_seed: Option<u64>) -> World {
    let star_seed = star_seed
        .or(config.star_seed)
        .unwrap_or_else(|| rand::rng().random());

    let mut graph = SceneGraph::new();
    let root = graph.root();

    let planet = graph.add(
        root,
        Node::mesh("planet", MeshKind::Planet).with_shadows(true, true),
    );
    let ocean = graph.add(root, Node::mesh("ocean", MeshKind::Ocean));
    let sun = graph.add(
        root,
        Node::mesh("sun", MeshKind::Sun).with_translation(Vec3::from(config.light_position)),
    );

    let star_group = graph.add(root, Node::pivot("stars"));
    let stars = scatter_stars(
        config.star_count,
        config.star_min_radius,
        config.star_max_radius,
        star_seed,
    )
    .into_iter()
    .enumerate()
    .map(|(i, pos)| {
        graph.add(
            star_group,
            Node::mesh(&format!("star-{i}"), MeshKind::Star).with_translation(pos),
        )
    })
    .collect();

    let orbit = graph.add(root, Node::pivot("moon-orbit"));
    let pivot = graph.add(orbit, Node::pivot("moon-pivot"));
    let moon = graph.add(
        pivot,
        Node::mesh("moon", MeshKind::Moon).with_translation(Vec3::from(config.moon_offset)),
    );

    // Transparent shells go last so they blend over everything opaque.
    let atmosphere = graph.add(root, Node::mesh("atmosphere", MeshKind::Atmosphere));

    info!(
        nodes = graph.len(),
        stars = config.star_count,
        star_seed,
        "World assembled"
    );

    World {
        graph,
        planet,
        ocean,
        atmosphere,
        sun,
        stars,
        moon,
        moon_orbit: MoonOrbit::new(orbit),
        star_seed,
    }
}
