//! Contact resolution between the player and game objects
//!
//! The physics layer only reports player-vs-object contacts (objects never
//! collide with each other). A contact that names the player twice, or a body
//! this world never spawned, means the physics categories are wired wrong.

use glam::Vec2;
use thiserror::Error;

use super::object::{ObjectKind, World};
use super::physics::{BodyId, Contact, PlayerBody};
use super::state::{GameEvent, RemovalReason, RunState, SoundCue};
use crate::tuning::Tuning;

/// A contact the simulation cannot make sense of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("contact reports the player on both sides")]
    PlayerOnBothSides,
    #[error("contact participant {0:?} is not a game object")]
    UnknownBody(BodyId),
}

/// Pick the non-player participant of a contact
pub fn other_participant(contact: &Contact) -> Result<BodyId, ContractViolation> {
    match (contact.a.is_player(), contact.b.is_player()) {
        (true, true) => Err(ContractViolation::PlayerOnBothSides),
        (true, false) => Ok(contact.b),
        (false, true) => Ok(contact.a),
        // Object-object contacts are masked out by the physics layer
        (false, false) => Err(ContractViolation::UnknownBody(contact.a)),
    }
}

/// Resolve one begin-contact. Returns whether score or stars changed.
///
/// Removal is immediate, so a later contact with the same object (in this step
/// or any other) finds nothing and resolves to `Ok(false)`.
pub fn resolve_contact(
    world: &mut World,
    run: &mut RunState,
    player: &mut dyn PlayerBody,
    contact: Contact,
    tuning: &Tuning,
) -> Result<bool, ContractViolation> {
    let id = other_participant(&contact)?;

    let Some(object) = world.get(id) else {
        if world.was_spawned(id) {
            log::debug!("Contact with removed object {:?} ignored", id);
            return Ok(false);
        }
        return Err(ContractViolation::UnknownBody(id));
    };

    let kind = object.kind;
    let response = object.resolve_collision(player.velocity(), tuning);

    if let Some(dy) = response.vertical_velocity {
        let vel = player.velocity();
        player.set_velocity(Vec2::new(vel.x, dy));
    }

    if let Some(delta) = response.score {
        run.add_reward(delta);
    }

    if response.remove {
        world.remove(id);
        let reason = match kind {
            ObjectKind::Star(_) => {
                run.events.push(GameEvent::Sound(SoundCue::StarPing));
                RemovalReason::Collected
            }
            ObjectKind::Platform(_) => RemovalReason::Broken,
        };
        run.events.push(GameEvent::ObjectRemoved { id, reason });
        log::debug!("{:?} {:?} removed ({:?})", kind, id, reason);
    }

    Ok(response.scoring_changed())
}
