//! Scene graph
//!
//! Nodes live in an arena owned by [`Scene`] and are addressed by
//! [`NodeId`]. Each node has a local transform, an optional mesh with its
//! material, and children.

mod gpu;
mod layout;

pub use gpu::{RenderObject, SceneGpu};
pub use layout::{asset_path, NodeDesc, PrimitiveShape, SceneLayout};

use std::sync::Arc;

use glam::Mat4;

use crate::renderer::fog::Fog;
use crate::renderer::geometry::MeshData;
use crate::renderer::light::DirectionalLight;
use crate::renderer::material::{MaterialDesc, Side};

/// Handle to a node of a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of the node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors raised while assembling a scene.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} is not part of the scene")]
    UnknownNode(NodeId),
    #[error("scene layout contains no nodes")]
    EmptyLayout,
}

/// A node of the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent node.
    pub transform: Mat4,
    pub mesh: Option<Arc<MeshData>>,
    pub material: Option<MaterialDesc>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// An empty grouping node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            mesh: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// A node drawing `mesh` with `material`.
    pub fn mesh(name: impl Into<String>, mesh: Arc<MeshData>, material: MaterialDesc) -> Self {
        Self {
            mesh: Some(mesh),
            material: Some(material),
            ..Self::new(name)
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Faces that render and receive picking hits.
    pub fn side(&self) -> Side {
        self.material.as_ref().map(|m| m.side).unwrap_or_default()
    }
}

/// The scene: node arena plus scene-wide lighting and atmosphere.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    /// Clear colour (linear RGB).
    pub background: [f32; 3],
    pub fog: Option<Fog>,
    pub lights: Vec<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            background: [0.0, 0.0, 0.0],
            fog: None,
            lights: Vec::new(),
        }
    }

    /// Add a root node.
    pub fn add(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// First node named `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Product of the node's and all its ancestors' transforms.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut world = node.transform;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            world = node.transform * world;
        }
        Some(world)
    }

    /// Fail with the first id that does not belong to this scene.
    pub fn check_nodes(&self, ids: &[NodeId]) -> Result<(), SceneError> {
        match ids.iter().find(|id| !self.contains(**id)) {
            Some(id) => Err(SceneError::UnknownNode(*id)),
            None => Ok(()),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
