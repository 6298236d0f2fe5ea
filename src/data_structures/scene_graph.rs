//! Scene graph and hierarchical scene organization.
//!
//! A [`SceneGraph`] owns a tree of [`SceneNode`]s rooted at a group node.
//! Subtrees are built detached (for instance by the glTF loader) and receive
//! their [`NodeId`]s when they are inserted. Removing a node drops its whole
//! subtree; no references into it survive.

use cgmath::{Deg, Matrix4, SquareMatrix};
use log::warn;

use crate::data_structures::{geometry::Geometry, light::Light, transform::Transform};

/// Identifier of a node inside one [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Nodes that were never inserted into a graph carry this id.
    pub const DETACHED: NodeId = NodeId(u32::MAX);

    pub fn index(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
}

impl Mesh {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}

/// Projection a camera node was authored with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraProjection {
    Perspective {
        fov_y: Deg<f32>,
        aspect: Option<f32>,
        near: f32,
        far: Option<f32>,
    },
    Orthographic {
        xmag: f32,
        ymag: f32,
        near: f32,
        far: f32,
    },
}

impl From<gltf::camera::Projection<'_>> for CameraProjection {
    fn from(projection: gltf::camera::Projection<'_>) -> Self {
        match projection {
            gltf::camera::Projection::Perspective(p) => CameraProjection::Perspective {
                // glTF stores the vertical field of view in radians
                fov_y: cgmath::Rad(p.yfov()).into(),
                aspect: p.aspect_ratio(),
                near: p.znear(),
                far: p.zfar(),
            },
            gltf::camera::Projection::Orthographic(o) => CameraProjection::Orthographic {
                xmag: o.xmag(),
                ymag: o.ymag(),
                near: o.znear(),
                far: o.zfar(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
    Camera(CameraProjection),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    id: NodeId,
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::DETACHED,
            name: name.into(),
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry) -> Self {
        Self::new(name, NodeKind::Mesh(Mesh::new(geometry)))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn camera(name: impl Into<String>, projection: CameraProjection) -> Self {
        Self::new(name, NodeKind::Camera(projection))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Appends a child to a node that has not been inserted yet. A child added
    /// to an attached node keeps the detached id.
    pub fn add_child(&mut self, child: SceneNode) {
        if self.id != NodeId::DETACHED {
            warn!(
                "Child {} added to attached node {} keeps no id.",
                child.name, self.name
            );
        }
        self.children.push(child);
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraProjection> {
        match &self.kind {
            NodeKind::Camera(projection) => Some(projection),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Depth-first pre-order walk over this node and all descendants.
    pub fn traverse<F>(&self, visit: &mut F)
    where
        F: FnMut(&SceneNode),
    {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Pre-order walk that also hands out each node's world matrix.
    /// `parent_world` is the world matrix of this node's parent.
    pub fn traverse_with_world<F>(&self, parent_world: &Matrix4<f32>, visit: &mut F)
    where
        F: FnMut(&SceneNode, &Matrix4<f32>),
    {
        let world = parent_world * self.transform.to_matrix();
        visit(self, &world);
        for child in &self.children {
            child.traverse_with_world(&world, visit);
        }
    }

    /// First node in pre-order that matches `predicate`.
    pub fn find_first<P>(&self, predicate: &P) -> Option<&SceneNode>
    where
        P: Fn(&SceneNode) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_first(predicate))
    }

    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.find_first(&|node: &SceneNode| node.id == id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(SceneNode::len).sum::<usize>()
    }

    fn assign_ids(&mut self, next_id: &mut u32) {
        self.id = NodeId(*next_id);
        *next_id += 1;
        for child in &mut self.children {
            child.assign_ids(next_id);
        }
    }

    fn remove_descendant(&mut self, id: NodeId) -> Option<SceneNode> {
        if let Some(pos) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }

    /// World matrix of the parent of node `id`, searched below this node.
    fn parent_world_of(&self, id: NodeId, parent_world: &Matrix4<f32>) -> Option<Matrix4<f32>> {
        if self.id == id {
            return Some(*parent_world);
        }
        let world = parent_world * self.transform.to_matrix();
        self.children
            .iter()
            .find_map(|child| child.parent_world_of(id, &world))
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    root: SceneNode,
    next_id: u32,
}

impl SceneGraph {
    pub fn new(name: impl Into<String>) -> Self {
        let mut root = SceneNode::group(name);
        let mut next_id = 0;
        root.assign_ids(&mut next_id);
        Self { root, next_id }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.root.find(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.root.find_mut(id)
    }

    /// Inserts below the root. Never fails.
    pub fn add_to_root(&mut self, mut node: SceneNode) -> NodeId {
        node.assign_ids(&mut self.next_id);
        let id = node.id;
        self.root.children.push(node);
        id
    }

    /// Detaches and returns the subtree rooted at `id`. The root itself cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.root.remove_descendant(id)
    }

    /// Walks the subtree rooted at `id` with correct world matrices.
    pub fn traverse_subtree_with_world<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(&SceneNode, &Matrix4<f32>),
    {
        let Some(parent_world) = self.root.parent_world_of(id, &Matrix4::identity()) else {
            return;
        };
        if let Some(node) = self.get(id) {
            node.traverse_with_world(&parent_world, visit);
        }
    }

    /// Walks the whole graph with world matrices.
    pub fn traverse_with_world<F>(&self, visit: &mut F)
    where
        F: FnMut(&SceneNode, &Matrix4<f32>),
    {
        self.root.traverse_with_world(&Matrix4::identity(), visit);
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Transform as _, Vector3};

    use super::*;

    fn translated(name: &str, x: f32) -> SceneNode {
        SceneNode::group(name)
            .with_transform(Transform::from_translation(Vector3::new(x, 0.0, 0.0)))
    }

    #[test]
    fn add_to_root_assigns_unique_ids_to_the_whole_subtree() {
        let mut graph = SceneGraph::new("Scene");
        let subtree = SceneNode::group("model")
            .with_child(SceneNode::group("a"))
            .with_child(SceneNode::group("b").with_child(SceneNode::group("c")));
        let model = graph.add_to_root(subtree);

        let mut ids = Vec::new();
        graph.root().traverse(&mut |node| ids.push(node.id()));
        assert_eq!(ids.len(), 5);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        assert!(!ids.contains(&NodeId::DETACHED));
        assert_eq!(graph.get(model).unwrap().name, "model");
        assert_eq!(model.index(), 1);
    }

    #[test]
    fn traversal_is_depth_first_pre_order() {
        let mut graph = SceneGraph::new("Scene");
        graph.add_to_root(
            SceneNode::group("a")
                .with_child(SceneNode::group("a1"))
                .with_child(SceneNode::group("a2")),
        );
        graph.add_to_root(SceneNode::group("b"));
        let mut names = Vec::new();
        graph.root().traverse(&mut |node| names.push(node.name.clone()));
        assert_eq!(names, ["Scene", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn world_matrices_compose_parent_transforms() {
        let mut graph = SceneGraph::new("Scene");
        let outer = graph.add_to_root(translated("outer", 100.0).with_child(
            translated("parent", 10.0).with_child(translated("child", 1.0)),
        ));
        let parent = graph.get(outer).unwrap().children()[0].id();

        let mut seen = Vec::new();
        graph.traverse_subtree_with_world(parent, &mut |node, world| {
            let origin = world.transform_point(Point3::new(0.0, 0.0, 0.0));
            seen.push((node.name.clone(), origin.x));
        });
        assert_eq!(seen, [("parent".to_string(), 110.0), ("child".to_string(), 111.0)]);
    }

    #[test]
    fn remove_drops_the_subtree() {
        let mut graph = SceneGraph::new("Scene");
        let model =
            graph.add_to_root(SceneNode::group("model").with_child(SceneNode::group("part")));
        assert_eq!(graph.len(), 3);
        let removed = graph.remove(model).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.get(model).is_none());
        assert!(graph.remove(graph.root_id()).is_none());
    }
}
