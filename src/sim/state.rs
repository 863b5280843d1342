//! Run state and presentation events
//!
//! A [`RunState`] lives for one attempt: created at launch, mutated every step
//! and on every scoring contact, and merged into the persistent profile once
//! when the run ends.

use serde::{Deserialize, Serialize};

use super::object::ScoreDelta;
use super::physics::BodyId;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Climbed past the end-of-level height
    ReachedTop,
    /// Dropped too far below the best height
    FellOff,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Player parked at the start, waiting for the first tap
    Ready,
    /// Active gameplay
    Running,
    /// Run ended (terminal)
    Ended(Outcome),
}

/// Sound effect cues for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    StarPing,
}

/// Why an object left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    Collected,
    Broken,
    Culled,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    StarsChanged(u32),
    ObjectRemoved {
        id: BodyId,
        reason: RemovalReason,
    },
    Sound(SoundCue),
    GameOver {
        score: u64,
        stars: u32,
        high_score: u64,
        outcome: Outcome,
    },
}

/// State of a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// Best whole-unit height reached so far
    pub max_height: i64,
    pub score: u64,
    /// Star count, carried over from the profile at run start
    pub stars: u32,
    /// Pending presentation events
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RunState {
    /// A fresh run: score 0, best height at the start position
    pub fn new(start_height: f32, stars: u32) -> Self {
        Self {
            phase: RunPhase::Ready,
            max_height: start_height.floor() as i64,
            score: 0,
            stars,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, RunPhase::Ended(_))
    }

    /// Award the climb above the previous best. Returns the points gained.
    pub fn record_height(&mut self, height: f32) -> u64 {
        let height = height.floor() as i64;
        if height <= self.max_height {
            return 0;
        }
        let gained = (height - self.max_height) as u64;
        self.max_height = height;
        self.score = self.score.saturating_add(gained);
        self.events.push(GameEvent::ScoreChanged(self.score));
        gained
    }

    /// Apply a collection reward
    pub fn add_reward(&mut self, delta: ScoreDelta) {
        if delta.points > 0 {
            self.score = self.score.saturating_add(delta.points);
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
        if delta.stars > 0 {
            self.stars = self.stars.saturating_add(delta.stars);
            self.events.push(GameEvent::StarsChanged(self.stars));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_run_starts_ready() {
        let run = RunState::new(80.0, 7);
        assert_eq!(run.phase, RunPhase::Ready);
        assert_eq!(run.max_height, 80);
        assert_eq!(run.score, 0);
        assert_eq!(run.stars, 7);
    }

    #[test]
    fn test_falling_back_scores_nothing() {
        let mut run = RunState::new(80.0, 0);
        assert_eq!(run.record_height(180.9), 100);
        assert_eq!(run.record_height(120.0), 0);
        assert_eq!(run.record_height(180.0), 0);
        assert_eq!(run.record_height(200.0), 20);
        assert_eq!(run.score, 120);
        assert_eq!(run.max_height, 200);
        assert_eq!(
            run.events,
            vec![GameEvent::ScoreChanged(100), GameEvent::ScoreChanged(120)]
        );
    }

    #[test]
    fn test_reward_events() {
        let mut run = RunState::new(80.0, 2);
        run.add_reward(ScoreDelta {
            points: 100,
            stars: 5,
        });
        assert_eq!(run.score, 100);
        assert_eq!(run.stars, 7);
        assert_eq!(
            run.events,
            vec![GameEvent::ScoreChanged(100), GameEvent::StarsChanged(7)]
        );
    }

    #[test]
    fn test_rewards_saturate_at_limits() {
        let mut run = RunState::new(80.0, u32::MAX - 2);
        run.score = u64::MAX - 10;
        run.add_reward(ScoreDelta {
            points: 100,
            stars: 5,
        });
        assert_eq!(run.score, u64::MAX);
        assert_eq!(run.stars, u32::MAX);

        assert_eq!(run.record_height(500.0), 420);
        assert_eq!(run.score, u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_score_is_sum_of_new_heights(
            heights in proptest::collection::vec(-500i32..5000, 1..64),
        ) {
            let mut run = RunState::new(80.0, 0);
            let mut best = 80i64;
            let mut expected = 0u64;
            let mut last_score = 0u64;
            for h in heights {
                let h = h as i64;
                if h > best {
                    expected += (h - best) as u64;
                    best = h;
                }
                run.record_height(h as f32);
                prop_assert!(run.score >= last_score);
                last_score = run.score;
            }
            prop_assert_eq!(run.score, expected);
            prop_assert_eq!(run.max_height, best);
        }
    }
}
