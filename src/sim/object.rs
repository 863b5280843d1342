//! Game objects: platforms and stars
//!
//! Objects are a tagged variant rather than a class hierarchy. Each kind has
//! a collision rule that returns a [`CollisionResponse`] describing what should
//! happen to the player, the score and the object itself; applying it is the
//! job of [`super::collision`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::BodyId;
use crate::tuning::Tuning;

/// Star types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StarKind {
    #[default]
    Normal,
    Special,
}

impl StarKind {
    /// Map a level-file type tag (0 = normal, 1 = special)
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(StarKind::Normal),
            1 => Some(StarKind::Special),
            _ => None,
        }
    }

    pub fn tag(self) -> i64 {
        match self {
            StarKind::Normal => 0,
            StarKind::Special => 1,
        }
    }

    /// Score awarded on collection
    pub fn points(self) -> u64 {
        match self {
            StarKind::Normal => 20,
            StarKind::Special => 100,
        }
    }

    /// Stars awarded on collection
    pub fn stars(self) -> u32 {
        match self {
            StarKind::Normal => 1,
            StarKind::Special => 5,
        }
    }
}

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Crumbles after one landing
    Break,
}

impl PlatformKind {
    /// Map a level-file type tag (0 = normal, 1 = break)
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(PlatformKind::Normal),
            1 => Some(PlatformKind::Break),
            _ => None,
        }
    }

    pub fn tag(self) -> i64 {
        match self {
            PlatformKind::Normal => 0,
            PlatformKind::Break => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Star(StarKind),
    Platform(PlatformKind),
}

/// Score and star increments granted by a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreDelta {
    pub points: u64,
    pub stars: u32,
}

/// Outcome of a collision rule
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResponse {
    /// New vertical velocity for the player (horizontal is kept)
    pub vertical_velocity: Option<f32>,
    /// Score and star increments
    pub score: Option<ScoreDelta>,
    /// The object leaves the world
    pub remove: bool,
}

impl CollisionResponse {
    /// Whether the HUD needs refreshing
    pub fn scoring_changed(&self) -> bool {
        self.score.is_some()
    }
}

/// A platform or star placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: BodyId,
    pub pos: Vec2,
    pub kind: ObjectKind,
}

impl GameObject {
    /// Collision rule for a contact with a player moving at `player_vel`
    pub fn resolve_collision(&self, player_vel: Vec2, tuning: &Tuning) -> CollisionResponse {
        match self.kind {
            ObjectKind::Star(kind) => CollisionResponse {
                vertical_velocity: Some(tuning.star_boost),
                score: Some(ScoreDelta {
                    points: kind.points(),
                    stars: kind.stars(),
                }),
                remove: true,
            },
            // Only catches a falling player; jumping up through is free
            ObjectKind::Platform(kind) if player_vel.y < 0.0 => CollisionResponse {
                vertical_velocity: Some(tuning.platform_bounce),
                score: None,
                remove: kind == PlatformKind::Break,
            },
            ObjectKind::Platform(_) => CollisionResponse::default(),
        }
    }

    /// True once the player has climbed more than `cull_distance` above us
    pub fn should_cull(&self, player_y: f32, cull_distance: f32) -> bool {
        player_y > self.pos.y + cull_distance
    }
}

/// Owned collection of live objects, kept sorted by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    objects: Vec<GameObject>,
    /// Next entity ID
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: BodyId::PLAYER.0 + 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an object; ids only grow so the list stays sorted
    pub fn spawn(&mut self, pos: Vec2, kind: ObjectKind) -> BodyId {
        let id = self.next_entity_id();
        self.objects.push(GameObject { id, pos, kind });
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&GameObject> {
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| &self.objects[i])
    }

    pub fn remove(&mut self, id: BodyId) -> Option<GameObject> {
        let index = self.objects.binary_search_by_key(&id, |o| o.id).ok()?;
        Some(self.objects.remove(index))
    }

    /// Whether `id` was ever handed out by this world (live or removed)
    pub fn was_spawned(&self, id: BodyId) -> bool {
        !id.is_player() && id.0 < self.next_id
    }

    /// Drop every object the player can no longer reach
    pub fn cull(&mut self, player_y: f32, cull_distance: f32) -> Vec<GameObject> {
        let mut culled = Vec::new();
        self.objects.retain(|obj| {
            if obj.should_cull(player_y, cull_distance) {
                culled.push(obj.clone());
                false
            } else {
                true
            }
        });
        culled
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
