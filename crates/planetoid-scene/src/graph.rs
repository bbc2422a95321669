//! Arena-backed scene graph of pivots and meshes.
//!
//! Nodes are addressed by [`NodeId`] and stored in insertion order; the root
//! (`NodeId` 0) always exists. World matrices compose parent-first, so turning
//! a pivot carries every descendant with it.

use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform: translation, XYZ Euler rotation in radians, uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Which drawable a mesh node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Planet,
    Ocean,
    Atmosphere,
    Sun,
    Star,
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Grouping node with no geometry.
    Pivot,
    Mesh(MeshKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            kind,
            cast_shadow: false,
            receive_shadow: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn pivot(name: &str) -> Self {
        Self::new(name, NodeKind::Pivot)
    }

    pub fn mesh(name: &str, kind: MeshKind) -> Self {
        Self::new(name, NodeKind::Mesh(kind))
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::pivot("scene")],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// First node with the given name, in insertion order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Product of every local matrix from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.get(id);
        while let Some(node) = current {
            matrix = node.transform.matrix() * matrix;
            current = node.parent.and_then(|p| self.get(p));
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).w_axis.truncate()
    }

    /// Mesh nodes in depth-first order with their world matrices.
    pub fn iter_meshes(&self) -> Vec<(NodeId, MeshKind, Mat4)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root(), Mat4::IDENTITY)];
        while let Some((id, parent_matrix)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let world = parent_matrix * node.transform.matrix();
            if let NodeKind::Mesh(kind) = node.kind {
                out.push((id, kind, world));
            }
            // Reverse so the first child is visited first.
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_root_exists() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.find("scene"), Some(graph.root()));
        assert!(graph.get(graph.root()).unwrap().parent().is_none());
    }

    #[test]
    fn test_add_links_parent_and_children() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add(root, Node::pivot("a"));
        let b = graph.add(a, Node::mesh("b", MeshKind::Moon));
        assert_eq!(graph.children(root), &[a]);
        assert_eq!(graph.children(a), &[b]);
        assert_eq!(graph.get(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn test_world_matrix_composes_through_pivots() {
        let mut graph = SceneGraph::new();
        let orbit = graph.add(graph.root(), Node::pivot("moon-orbit"));
        let pivot = graph.add(orbit, Node::pivot("moon-pivot"));
        let moon = graph.add(
            pivot,
            Node::mesh("moon", MeshKind::Moon).with_translation(Vec3::new(0.0, 150.0, 100.0)),
        );

        assert!(approx(graph.world_position(moon), Vec3::new(0.0, 150.0, 100.0)));

        // A quarter turn about X maps +Y to +Z and +Z to -Y.
        graph.get_mut(orbit).unwrap().transform.rotation.x = std::f32::consts::FRAC_PI_2;
        assert!(approx(graph.world_position(moon), Vec3::new(0.0, -100.0, 150.0)));
    }

    #[test]
    fn test_rotation_preserves_distance_from_pivot() {
        let mut graph = SceneGraph::new();
        let orbit = graph.add(graph.root(), Node::pivot("orbit"));
        let moon = graph.add(
            orbit,
            Node::mesh("moon", MeshKind::Moon).with_translation(Vec3::new(0.0, 150.0, 100.0)),
        );
        let radius = graph.world_position(moon).length();
        graph.get_mut(orbit).unwrap().transform.rotation = Vec3::new(0.7, 0.35, 0.0);
        assert!((graph.world_position(moon).length() - radius).abs() < 1e-3);
    }

    #[test]
    fn test_iter_meshes_depth_first() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add(root, Node::mesh("planet", MeshKind::Planet));
        let orbit = graph.add(root, Node::pivot("orbit"));
        graph.add(orbit, Node::mesh("moon", MeshKind::Moon));
        graph.add(root, Node::mesh("sun", MeshKind::Sun));

        let kinds: Vec<_> = graph.iter_meshes().into_iter().map(|(_, k, _)| k).collect();
        assert_eq!(kinds, [MeshKind::Planet, MeshKind::Moon, MeshKind::Sun]);
    }

    #[test]
    fn test_shadow_flags() {
        let node = Node::mesh("planet", MeshKind::Planet).with_shadows(true, true);
        assert!(node.cast_shadow && node.receive_shadow);
        assert!(!Node::pivot("p").cast_shadow);
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(SceneGraph::new().find("nothing"), None);
    }
}
