//! Gameplay simulation module
//!
//! All gameplay logic lives here. This module is single-threaded and has no
//! rendering or platform dependencies:
//! - Physics is an external collaborator behind [`PlayerBody`]
//! - Objects live in an owned [`World`], iterated in id order
//! - Presentation reacts to queued [`GameEvent`]s

pub mod collision;
pub mod object;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{ContractViolation, other_participant, resolve_contact};
pub use object::{
    CollisionResponse, GameObject, ObjectKind, PlatformKind, ScoreDelta, StarKind, World,
};
pub use physics::{BodyId, Contact, ContactTracker, PlayerBody, SimpleBody};
pub use state::{GameEvent, Outcome, RemovalReason, RunPhase, RunState, SoundCue};
pub use tick::{Parallax, RunController, TickInput, wrap_horizontal};
