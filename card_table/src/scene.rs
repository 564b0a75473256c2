//! Scene collaborator: the table of visual entities the core animates.
//!
//! The core never owns entities. It asks the scene to create them, keeps
//! their [`EntityId`] handles in the table's containers, and schedules
//! transform/opacity changes against those handles. A handle is valid until
//! the scene is told to destroy it.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Opaque handle into a scene-owned entity table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntityId(u64);

impl EntityId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, Euler rotation (degrees) and scale of an entity.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// What kind of entity the core is asking the scene for.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EntityKind {
    Card,
    Coin,
    /// A seat marker showing where a player sits.
    Seat,
    /// The pause menu panel.
    Panel,
    Label(String),
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Coin => write!(f, "coin"),
            Self::Seat => write!(f, "seat"),
            Self::Panel => write!(f, "panel"),
            Self::Label(text) => write!(f, "label '{text}'"),
        }
    }
}

/// Entity operations provided by the rendering/scene collaborator.
///
/// Setters return `false` when the handle no longer refers to a live entity.
pub trait Scene {
    fn create(&mut self, kind: EntityKind, transform: Transform) -> EntityId;
    fn destroy(&mut self, id: EntityId) -> bool;
    fn is_valid(&self, id: EntityId) -> bool;
    fn transform(&self, id: EntityId) -> Option<Transform>;
    fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool;
    fn opacity(&self, id: EntityId) -> Option<f32>;
    fn set_opacity(&mut self, id: EntityId, opacity: f32) -> bool;
}

#[derive(Clone, Debug)]
pub struct SceneEntity {
    pub kind: EntityKind,
    pub transform: Transform,
    pub opacity: f32,
}

/// In-memory scene keyed by monotonically allocated handles.
///
/// Handles are never reused, so a destroyed handle stays invalid forever.
#[derive(Debug, Default)]
pub struct SceneGraph {
    entities: HashMap<EntityId, SceneEntity>,
    next_id: u64,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    /// Count live entities of a kind. Labels match on kind only, not text.
    #[must_use]
    pub fn count_kind(&self, kind: &EntityKind) -> usize {
        self.entities
            .values()
            .filter(|entity| match (kind, &entity.kind) {
                (EntityKind::Label(_), EntityKind::Label(_)) => true,
                (a, b) => a == b,
            })
            .count()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entities.values().filter_map(|entity| match &entity.kind {
            EntityKind::Label(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Scene for SceneGraph {
    fn create(&mut self, kind: EntityKind, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            SceneEntity {
                kind,
                transform,
                opacity: 1.0,
            },
        );
        id
    }

    fn destroy(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn is_valid(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).map(|entity| entity.transform)
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.transform = transform;
                true
            }
            None => false,
        }
    }

    fn opacity(&self, id: EntityId) -> Option<f32> {
        self.entities.get(&id).map(|entity| entity.opacity)
    }

    fn set_opacity(&mut self, id: EntityId, opacity: f32) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }
}
