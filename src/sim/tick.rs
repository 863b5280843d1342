//! Per-frame run controller
//!
//! Drives one run from launch to game over. The host calls
//! [`RunController::handle_contact`] for every begin-contact its physics
//! engine reports and [`RunController::step`] once per frame after physics.

use glam::Vec2;

use super::collision::resolve_contact;
use super::object::World;
use super::physics::{Contact, PlayerBody};
use super::state::{GameEvent, Outcome, RemovalReason, RunPhase, RunState};
use crate::level::LevelLayout;
use crate::persistence::{KeyValueStore, PersistentState};
use crate::tuning::Tuning;

/// Input for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Screen tapped this frame (launches the player)
    pub tap: bool,
    /// Smoothed horizontal tilt, roughly -1..1
    pub tilt: f32,
}

/// Vertical layer offsets for scrolling; negative values scroll down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Parallax {
    pub background: f32,
    pub midground: f32,
    pub foreground: f32,
}

impl Parallax {
    /// Offsets for a player at `height`
    pub fn for_height(height: f32, tuning: &Tuning) -> Self {
        let lift = (height - tuning.parallax_start).max(0.0);
        Self {
            background: -lift / tuning.background_divisor,
            midground: -lift / tuning.midground_divisor,
            foreground: -lift,
        }
    }
}

/// Where a player at `x` should be teleported to, if it left the viewport
pub fn wrap_horizontal(x: f32, width: f32, margin: f32) -> Option<f32> {
    if x < -margin {
        Some(width + margin)
    } else if x > width + margin {
        Some(-margin)
    } else {
        None
    }
}

/// Owns the world, the current run and the persistent profile
#[derive(Debug)]
pub struct RunController<S: KeyValueStore> {
    tuning: Tuning,
    layout: LevelLayout,
    world: World,
    run: RunState,
    profile: PersistentState,
    store: S,
    parallax: Parallax,
}

impl<S: KeyValueStore> RunController<S> {
    /// Load the profile from `store` and set up the first run
    pub fn new(layout: LevelLayout, tuning: Tuning, store: S) -> Self {
        let profile = PersistentState::load(&store);
        let mut controller = Self {
            run: RunState::new(tuning.player_start.y, profile.stars),
            tuning,
            layout,
            world: World::new(),
            profile,
            store,
            parallax: Parallax::default(),
        };
        controller.populate_world();
        controller
    }

    fn populate_world(&mut self) {
        let scale_x = self.tuning.scale_x();
        self.world = World::new();
        for placed in &self.layout.objects {
            let pos = Vec2::new(placed.pos.x * scale_x, placed.pos.y);
            self.world.spawn(pos, placed.kind);
        }
    }

    /// Start over with a fresh world; the player is parked at the start
    pub fn restart(&mut self, body: &mut dyn PlayerBody) {
        body.set_dynamic(false);
        body.set_velocity(Vec2::ZERO);
        body.set_position(self.player_start());
        self.run = RunState::new(self.tuning.player_start.y, self.profile.stars);
        self.parallax = Parallax::default();
        self.populate_world();
        log::info!("Run reset ({} objects)", self.world.len());
    }

    /// Start position in world space
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.tuning.player_start.x * self.tuning.scale_x(),
            self.tuning.player_start.y,
        )
    }

    /// Resolve a begin-contact. Returns whether the HUD needs refreshing.
    pub fn handle_contact(&mut self, body: &mut dyn PlayerBody, contact: Contact) -> bool {
        if !self.run.is_running() {
            return false;
        }
        match resolve_contact(&mut self.world, &mut self.run, body, contact, &self.tuning) {
            Ok(changed) => changed,
            Err(violation) => {
                if cfg!(debug_assertions) {
                    panic!("physics contact contract violated: {violation}");
                }
                log::error!("Ignoring contact {:?}: {}", contact, violation);
                false
            }
        }
    }

    /// Advance the run by one frame
    pub fn step(&mut self, body: &mut dyn PlayerBody, input: &TickInput) {
        match self.run.phase {
            RunPhase::Ready => {
                if input.tap {
                    body.set_dynamic(true);
                    body.apply_impulse(Vec2::new(0.0, self.tuning.launch_impulse));
                    self.run.phase = RunPhase::Running;
                    log::info!("Run started");
                }
                return;
            }
            RunPhase::Ended(_) => return,
            RunPhase::Running => {}
        }

        // Tilt steers; gravity owns the vertical axis
        let vel = body.velocity();
        body.set_velocity(Vec2::new(input.tilt * self.tuning.tilt_speed, vel.y));

        let pos = body.position();

        // Progress only counts new heights
        self.run.record_height(pos.y);

        let culled = self.world.cull(pos.y, self.tuning.cull_distance);
        if !culled.is_empty() {
            log::debug!("Culled {} objects below y={}", culled.len(), pos.y);
        }
        for obj in culled {
            self.run.events.push(GameEvent::ObjectRemoved {
                id: obj.id,
                reason: RemovalReason::Culled,
            });
        }

        self.parallax = Parallax::for_height(pos.y, &self.tuning);

        let (width, margin) = (self.tuning.viewport_width, self.tuning.wrap_margin);
        if let Some(x) = wrap_horizontal(pos.x, width, margin) {
            body.set_position(Vec2::new(x, pos.y));
        }

        if pos.y > self.layout.end_y {
            self.end_run(Outcome::ReachedTop);
        } else if pos.y < self.run.max_height as f32 - self.tuning.fall_limit {
            self.end_run(Outcome::FellOff);
        }
    }

    /// RUNNING -> ENDED: save the profile and announce game over
    fn end_run(&mut self, outcome: Outcome) {
        if self.run.is_over() {
            return;
        }
        self.run.phase = RunPhase::Ended(outcome);
        self.profile.save(&mut self.store, self.run.score, self.run.stars);
        self.run.events.push(GameEvent::GameOver {
            score: self.run.score,
            stars: self.run.stars,
            high_score: self.profile.high_score,
            outcome,
        });
        log::info!(
            "Game over ({:?}): score {}, stars {}, best {}",
            outcome,
            self.run.score,
            self.run.stars,
            self.profile.high_score
        );
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.run.events)
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn profile(&self) -> &PersistentState {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn parallax(&self) -> Parallax {
        self.parallax
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
