//! Physics collaborator seam
//!
//! Gravity, integration and contact detection belong to whatever rigid-body
//! engine the host uses. The simulation only reads the player's position and
//! velocity, writes them back, and reacts to begin-contact notifications.
//!
//! [`SimpleBody`] and [`ContactTracker`] are a small reference implementation
//! used by the headless driver and the tests.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::{ObjectKind, World};

/// Identity of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The player avatar; game objects are numbered from 1
    pub const PLAYER: BodyId = BodyId(0);

    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }
}

/// A begin-contact notification. Participants may arrive in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

impl Contact {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }
}

/// The player's rigid body as seen by the simulation
pub trait PlayerBody {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn set_velocity(&mut self, vel: Vec2);
    /// Toggle whether gravity and integration affect the body
    fn set_dynamic(&mut self, dynamic: bool);
    fn is_dynamic(&self) -> bool;
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Player collision radius for the reference contact check
pub const PLAYER_RADIUS: f32 = 20.0;
/// Star collision radius
pub const STAR_RADIUS: f32 = 15.0;
/// Platform half extents (width, height)
pub const PLATFORM_HALF_EXTENTS: Vec2 = Vec2::new(40.0, 8.0);

/// Minimal point-mass integrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub dynamic: bool,
}

impl SimpleBody {
    /// A static body at `pos`, as the player sits before launch
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            mass: crate::consts::PLAYER_MASS,
            dynamic: false,
        }
    }

    /// Replace the body's mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Advance one timestep under constant vertical gravity
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if !self.dynamic {
            return;
        }
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }
}

impl PlayerBody for SimpleBody {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if self.dynamic {
            self.vel += impulse / self.mass;
        }
    }
}

/// Circle-vs-shape overlap test against a single game object
fn overlaps(player_pos: Vec2, kind: ObjectKind, object_pos: Vec2) -> bool {
    match kind {
        ObjectKind::Star(_) => {
            player_pos.distance_squared(object_pos) <= (PLAYER_RADIUS + STAR_RADIUS).powi(2)
        }
        ObjectKind::Platform(_) => {
            // Closest point on the box to the circle center
            let min = object_pos - PLATFORM_HALF_EXTENTS;
            let max = object_pos + PLATFORM_HALF_EXTENTS;
            let closest = player_pos.clamp(min, max);
            player_pos.distance_squared(closest) <= PLAYER_RADIUS * PLAYER_RADIUS
        }
    }
}

/// Reports a contact only on the step the overlap begins
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<BodyId>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin-contact events between the player and live objects, in id order
    pub fn begin_contacts(&mut self, player_pos: Vec2, world: &World) -> Vec<Contact> {
        let now: BTreeSet<BodyId> = world
            .iter()
            .filter(|obj| overlaps(player_pos, obj.kind, obj.pos))
            .map(|obj| obj.id)
            .collect();

        let begun: Vec<Contact> = now
            .difference(&self.touching)
            .map(|&id| Contact::new(BodyId::PLAYER, id))
            .collect();
        self.touching = now;
        begun
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::{PlatformKind, StarKind};

    #[test]
    fn test_static_body_ignores_gravity_and_impulse() {
        let mut body = SimpleBody::new(Vec2::new(160.0, 80.0));
        body.apply_impulse(Vec2::new(0.0, 20.0));
        body.integrate(1.0 / 60.0, -300.0);
        assert_eq!(body.pos, Vec2::new(160.0, 80.0));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_launch_impulse_scales_by_mass() {
        let mut body = SimpleBody::new(Vec2::ZERO);
        body.set_dynamic(true);
        body.apply_impulse(Vec2::new(0.0, 20.0));
        assert!((body.vel.y - 400.0).abs() < 1e-3);

        let mut heavy = SimpleBody::new(Vec2::ZERO).with_mass(0.1);
        heavy.set_dynamic(true);
        heavy.apply_impulse(Vec2::new(0.0, 20.0));
        assert!((heavy.vel.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_contact_begins_once_per_overlap() {
        let mut world = World::new();
        let star = world.spawn(Vec2::new(100.0, 100.0), ObjectKind::Star(StarKind::Normal));
        let _far = world.spawn(
            Vec2::new(100.0, 600.0),
            ObjectKind::Platform(PlatformKind::Normal),
        );
        let mut tracker = ContactTracker::new();

        let first = tracker.begin_contacts(Vec2::new(100.0, 110.0), &world);
        assert_eq!(first, vec![Contact::new(BodyId::PLAYER, star)]);

        // Still overlapping: no new contact
        let still = tracker.begin_contacts(Vec2::new(100.0, 105.0), &world);
        assert!(still.is_empty());

        // Leave and come back
        let away = tracker.begin_contacts(Vec2::new(100.0, 300.0), &world);
        assert!(away.is_empty());
        let again = tracker.begin_contacts(Vec2::new(100.0, 100.0), &world);
        assert_eq!(again, vec![Contact::new(BodyId::PLAYER, star)]);
    }

    #[test]
    fn test_platform_box_overlap() {
        let mut world = World::new();
        let platform = world.spawn(
            Vec2::new(160.0, 320.0),
            ObjectKind::Platform(PlatformKind::Break),
        );
        let mut tracker = ContactTracker::new();
        // Just above the top edge, within the player radius
        let contacts = tracker.begin_contacts(Vec2::new(190.0, 345.0), &world);
        assert_eq!(contacts, vec![Contact::new(BodyId::PLAYER, platform)]);
    }
}
