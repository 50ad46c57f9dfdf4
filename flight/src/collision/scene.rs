use serde::{Deserialize, Serialize};

use crate::{Aabb, Vec3f};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneObjectKind {
    #[default]
    Group,
    Mesh,
}

/// Minimal scene-graph node: a named transform with optional box geometry.
///
/// Only translation is modelled. A node's world position is the sum of its
/// own `offset` and every ancestor's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub kind: SceneObjectKind,
    #[serde(default)]
    pub offset: Vec3f,
    /// Local-space geometry bounds; meaningful for meshes.
    #[serde(default)]
    pub geometry: Option<Aabb>,
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    pub fn group(name: impl Into<String>, offset: Vec3f, children: Vec<SceneObject>) -> Self {
        Self { name: name.into(), kind: SceneObjectKind::Group, offset, geometry: None, children }
    }

    pub fn mesh(name: impl Into<String>, offset: Vec3f, geometry: Aabb) -> Self {
        Self {
            name: name.into(),
            kind: SceneObjectKind::Mesh,
            offset,
            geometry: Some(geometry),
            children: Vec::new(),
        }
    }

    /// Box mesh of `size` standing on the ground at (x, base_y, z).
    pub fn block(name: impl Into<String>, base: Vec3f, size: Vec3f) -> Self {
        let half = size * 0.5;
        Self::mesh(
            name,
            base,
            Aabb::new(Vec3f::new(-half.x, 0.0, -half.z), Vec3f::new(half.x, size.y, half.z)),
        )
    }

    pub fn with_children(mut self, children: Vec<SceneObject>) -> Self {
        self.children = children;
        self
    }

    /// World bounds of this node's geometry and every descendant's, or
    /// `None` when the subtree has no geometry at all.
    pub fn world_bounds(&self, parent_origin: Vec3f) -> Option<Aabb> {
        let origin = parent_origin + self.offset;
        let own = self.geometry.map(|g| g.translated(origin));
        self.children
            .iter()
            .filter_map(|c| c.world_bounds(origin))
            .fold(own, |acc, b| Some(acc.map_or(b, |a| a.union(&b))))
    }

    /// Depth-first pre-order walk handing each node its parent's world origin.
    pub fn walk<'a>(&'a self, parent_origin: Vec3f, visit: &mut impl FnMut(&'a SceneObject, Vec3f)) {
        visit(self, parent_origin);
        let origin = parent_origin + self.offset;
        for child in &self.children {
            child.walk(origin, visit);
        }
    }
}

/// Size gate deciding which meshes are big enough to be obstacles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleFilter {
    /// Strictly taller than this.
    pub min_height: f32,
    /// Strictly wider than this along x or z.
    pub min_footprint: f32,
}

impl ObstacleFilter {
    pub fn accepts(&self, bounds: &Aabb) -> bool {
        let size = bounds.size();
        size.y > self.min_height && (size.x > self.min_footprint || size.z > self.min_footprint)
    }
}

/// Hand-built scene content: buildings and other props.
pub const SCENE_FILTER: ObstacleFilter = ObstacleFilter { min_height: 2.0, min_footprint: 1.0 };
/// Imported city models carry lots of street furniture, so the gate is higher.
pub const MODEL_FILTER: ObstacleFilter = ObstacleFilter { min_height: 3.0, min_footprint: 2.0 };
