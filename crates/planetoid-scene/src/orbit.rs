//! Moon orbit animation.

use crate::graph::{NodeId, SceneGraph};

/// Handle to the pivot that carries the moon around the planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonOrbit {
    pivot: NodeId,
}

impl MoonOrbit {
    pub fn new(pivot: NodeId) -> Self {
        Self { pivot }
    }

    pub fn pivot(&self) -> NodeId {
        self.pivot
    }

    /// Turn the orbit pivot by `speed` about X and `speed / 2` about Y.
    ///
    /// Halving and doubling are exact in binary floating point, so the X angle
    /// stays exactly twice the Y angle for any sequence of normal speeds.
    /// Returns `false` if the pivot is not in `graph`.
    pub fn advance(&self, graph: &mut SceneGraph, speed: f32) -> bool {
        let Some(node) = graph.get_mut(self.pivot) else {
            return false;
        };
        node.transform.rotation.x += speed;
        node.transform.rotation.y += speed / 2.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn orbit_graph() -> (SceneGraph, MoonOrbit) {
        let mut graph = SceneGraph::new();
        let pivot = graph.add(graph.root(), Node::pivot("moon-orbit"));
        (graph, MoonOrbit::new(pivot))
    }

    #[test]
    fn test_single_step() {
        let (mut graph, orbit) = orbit_graph();
        assert!(orbit.advance(&mut graph, 0.01));
        let rot = graph.get(orbit.pivot()).unwrap().transform.rotation;
        assert_eq!(rot.x, 0.01);
        assert_eq!(rot.y, 0.005);
        assert_eq!(rot.z, 0.0);
    }

    #[test]
    fn test_x_is_twice_y_for_random_speed_sequences() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let (mut graph, orbit) = orbit_graph();
            for _ in 0..1000 {
                let speed = rng.random_range(0.001_f32..0.1);
                orbit.advance(&mut graph, speed);
                let rot = graph.get(orbit.pivot()).unwrap().transform.rotation;
                assert_eq!(rot.x, 2.0 * rot.y);
            }
        }
    }

    #[test]
    fn test_missing_pivot() {
        let (_, orbit) = orbit_graph();
        let mut other = SceneGraph::new();
        assert!(!orbit.advance(&mut other, 0.01));
    }
}
