//! Level layouts
//!
//! A level document names reusable patterns (lists of local offsets with a
//! type tag) and places them at world origins, separately for platforms and
//! stars. Loading expands every placement into concrete objects:
//!
//! ```json
//! {
//!   "Platforms": {
//!     "Patterns": { "Single": [{ "x": 0, "y": 0, "type": 0 }] },
//!     "Positions": [{ "x": 160, "y": 320, "pattern": "Single" }]
//!   },
//!   "Stars": { "Patterns": { ... }, "Positions": [ ... ] },
//!   "EndY": 6000
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::object::{ObjectKind, PlatformKind, StarKind};

/// The level shipped with the game
const BUILTIN_LEVEL: &str = include_str!("../assets/level01.json");

/// Errors raised while loading a level. All of them are fatal for the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{section} position references unknown pattern '{pattern}'")]
    UnknownPattern {
        section: &'static str,
        pattern: String,
    },
    #[error("{section} pattern '{pattern}' has invalid type tag {tag}")]
    InvalidKind {
        section: &'static str,
        pattern: String,
        tag: i64,
    },
}

/// One entry of a pattern, relative to the placement origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: i64,
}

/// Instruction to stamp a pattern at a world origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub pattern: String,
}

/// Patterns and placements for one object family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    #[serde(rename = "Patterns")]
    pub patterns: BTreeMap<String, Vec<TemplateEntry>>,
    #[serde(rename = "Positions")]
    pub positions: Vec<Placement>,
}

/// Raw level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(rename = "Platforms")]
    pub platforms: SectionData,
    #[serde(rename = "Stars")]
    pub stars: SectionData,
    #[serde(rename = "EndY")]
    pub end_y: i64,
}

/// A concrete object placement in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    pub pos: Vec2,
    pub kind: ObjectKind,
}

/// A fully expanded level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    /// Platforms first, then stars, each in placement order
    pub objects: Vec<PlacedObject>,
    /// Climbing past this height wins the run
    pub end_y: f32,
}

impl LevelLayout {
    /// Expand a parsed document
    pub fn load(data: &LevelData) -> Result<Self, LoadError> {
        let mut objects = Vec::new();
        expand_section(&data.platforms, "Platforms", &mut objects, |tag| {
            PlatformKind::from_tag(tag).map(ObjectKind::Platform)
        })?;
        expand_section(&data.stars, "Stars", &mut objects, |tag| {
            StarKind::from_tag(tag).map(ObjectKind::Star)
        })?;

        log::info!(
            "Level loaded: {} objects, end at y={}",
            objects.len(),
            data.end_y
        );

        Ok(Self {
            objects,
            end_y: data.end_y as f32,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let data: LevelData = serde_json::from_str(json)?;
        Self::load(&data)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The level bundled with the crate
    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_json(BUILTIN_LEVEL)
    }
}

fn expand_section(
    section: &SectionData,
    name: &'static str,
    out: &mut Vec<PlacedObject>,
    kind_of: impl Fn(i64) -> Option<ObjectKind>,
) -> Result<(), LoadError> {
    for placement in &section.positions {
        let pattern = section
            .patterns
            .get(&placement.pattern)
            .ok_or_else(|| LoadError::UnknownPattern {
                section: name,
                pattern: placement.pattern.clone(),
            })?;

        let origin = Vec2::new(placement.x, placement.y);
        for entry in pattern {
            let kind = kind_of(entry.kind).ok_or_else(|| LoadError::InvalidKind {
                section: name,
                pattern: placement.pattern.clone(),
                tag: entry.kind,
            })?;
            out.push(PlacedObject {
                pos: origin + Vec2::new(entry.x, entry.y),
                kind,
            });
        }
    }
    Ok(())
}

// Procedural generation

/// Vertical gap between generated rows
const ROW_SPACING_MIN: u32 = 90;
const ROW_SPACING_MAX: u32 = 160;
/// Generated rows start this high
const FIRST_ROW_Y: f32 = 200.0;
/// Tallest level the generator will build
pub const MAX_GENERATED_END_Y: i64 = 1_000_000;

fn entry(x: f32, y: f32, kind: i64) -> TemplateEntry {
    TemplateEntry { x, y, kind }
}

fn platform_patterns() -> BTreeMap<String, Vec<TemplateEntry>> {
    BTreeMap::from([
        ("Single".to_string(), vec![entry(0.0, 0.0, 0)]),
        ("SingleBreak".to_string(), vec![entry(0.0, 0.0, 1)]),
        (
            "Diagonal".to_string(),
            vec![entry(-60.0, 0.0, 0), entry(0.0, 50.0, 0), entry(60.0, 100.0, 0)],
        ),
        (
            "Stairs".to_string(),
            vec![entry(-60.0, 0.0, 1), entry(0.0, 50.0, 0), entry(60.0, 100.0, 1)],
        ),
    ])
}

fn star_patterns() -> BTreeMap<String, Vec<TemplateEntry>> {
    BTreeMap::from([
        ("Single".to_string(), vec![entry(0.0, 0.0, 0)]),
        ("Special".to_string(), vec![entry(0.0, 0.0, 1)]),
        (
            "Column".to_string(),
            vec![entry(0.0, 0.0, 0), entry(0.0, 40.0, 0), entry(0.0, 80.0, 0)],
        ),
        (
            "Diamond".to_string(),
            vec![
                entry(0.0, 0.0, 0),
                entry(-30.0, 30.0, 0),
                entry(30.0, 30.0, 0),
                entry(0.0, 60.0, 1),
            ],
        ),
    ])
}

/// Build a random level document reaching `end_y`, reproducible from `seed`.
/// `end_y` is clamped to `0..=MAX_GENERATED_END_Y`.
pub fn generate(seed: u64, end_y: i64) -> LevelData {
    let end_y = end_y.clamp(0, MAX_GENERATED_END_Y);
    let mut rng = Pcg32::seed_from_u64(seed);

    let platform_names: Vec<String> = platform_patterns().into_keys().collect();
    let star_names: Vec<String> = star_patterns().into_keys().collect();

    let mut platforms = Vec::new();
    let mut stars = Vec::new();

    let mut y = FIRST_ROW_Y;
    while y < end_y as f32 {
        // Harder patterns get more likely as the level climbs
        let progress = y / end_y.max(1) as f32;
        let pattern = if rng.random_bool(f64::from(0.5 + progress * 0.4)) {
            platform_names[rng.random_range(0..platform_names.len())].clone()
        } else {
            "Single".to_string()
        };
        platforms.push(Placement {
            x: rng.random_range(80..=240u32) as f32,
            y,
            pattern,
        });

        if rng.random_bool(0.35) {
            stars.push(Placement {
                x: rng.random_range(60..=260u32) as f32,
                y: y + 60.0,
                pattern: star_names[rng.random_range(0..star_names.len())].clone(),
            });
        }

        y += rng.random_range(ROW_SPACING_MIN..=ROW_SPACING_MAX) as f32;
    }

    log::info!(
        "Generated level (seed {}): {} platform rows, {} star groups",
        seed,
        platforms.len(),
        stars.len()
    );

    LevelData {
        platforms: SectionData {
            patterns: platform_patterns(),
            positions: platforms,
        },
        stars: SectionData {
            patterns: star_patterns(),
            positions: stars,
        },
        end_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_LEVEL: &str = r#"{
        "Platforms": {
            "Patterns": {
                "Pair": [ { "x": 0, "y": 0, "type": 0 }, { "x": 50, "y": 25, "type": 1 } ]
            },
            "Positions": [ { "x": 100, "y": 300, "pattern": "Pair" } ]
        },
        "Stars": {
            "Patterns": { "Single": [ { "x": 0, "y": 0, "type": 1 } ] },
            "Positions": [
                { "x": 160, "y": 220, "pattern": "Single" },
                { "x": 40, "y": 500, "pattern": "Single" }
            ]
        },
        "EndY": 900
    }"#;

    #[test]
    fn test_expands_patterns_into_world_positions() {
        let layout = LevelLayout::from_json(SMALL_LEVEL).expect("valid level");
        assert_eq!(layout.end_y, 900.0);
        assert_eq!(
            layout.objects,
            vec![
                PlacedObject {
                    pos: Vec2::new(100.0, 300.0),
                    kind: ObjectKind::Platform(PlatformKind::Normal),
                },
                PlacedObject {
                    pos: Vec2::new(150.0, 325.0),
                    kind: ObjectKind::Platform(PlatformKind::Break),
                },
                PlacedObject {
                    pos: Vec2::new(160.0, 220.0),
                    kind: ObjectKind::Star(StarKind::Special),
                },
                PlacedObject {
                    pos: Vec2::new(40.0, 500.0),
                    kind: ObjectKind::Star(StarKind::Special),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_pattern_fails() {
        let json = SMALL_LEVEL.replace(r#""pattern": "Pair""#, r#""pattern": "Missing""#);
        match LevelLayout::from_json(&json) {
            Err(LoadError::UnknownPattern { section, pattern }) => {
                assert_eq!(section, "Platforms");
                assert_eq!(pattern, "Missing");
            }
            other => panic!("expected unknown pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_type_fails() {
        let json = SMALL_LEVEL.replace(r#""type": 1 } ] },"#, r#""type": 2 } ] },"#);
        assert!(matches!(
            LevelLayout::from_json(&json),
            Err(LoadError::InvalidKind { tag: 2, .. })
        ));
    }

    #[test]
    fn test_missing_or_mistyped_fields_fail() {
        let json = SMALL_LEVEL.replace(r#""EndY": 900"#, r#""EndY": "high""#);
        assert!(matches!(
            LevelLayout::from_json(&json),
            Err(LoadError::Parse(_))
        ));

        assert!(matches!(
            LevelLayout::from_json(r#"{ "Platforms": { "Patterns": {}, "Positions": [] } }"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(matches!(
            LevelLayout::from_path("/definitely/not/here.json"),
            Err(LoadError::Io(_))
        ));
    }

    #[test]
    fn test_builtin_level_loads() {
        let layout = LevelLayout::builtin().expect("bundled level is valid");
        assert!(!layout.objects.is_empty());
        assert!(layout.end_y > 0.0);
        let kinds: Vec<ObjectKind> = layout.objects.iter().map(|o| o.kind).collect();
        assert!(kinds.contains(&ObjectKind::Platform(PlatformKind::Break)));
        assert!(kinds.contains(&ObjectKind::Star(StarKind::Special)));
    }

    #[test]
    fn test_generated_level_is_reproducible_and_valid() {
        let a = generate(42, 3000);
        let b = generate(42, 3000);
        assert_eq!(a, b);
        assert_ne!(a, generate(43, 3000));

        let layout = LevelLayout::load(&a).expect("generated level is valid");
        assert_eq!(layout.end_y, 3000.0);
        assert!(layout.objects.len() >= a.platforms.positions.len());
        assert!(a.platforms.positions.iter().all(|p| p.y < 3000.0));
    }

    #[test]
    fn test_generated_height_is_clamped() {
        let huge = generate(7, i64::MAX);
        assert_eq!(huge.end_y, MAX_GENERATED_END_Y);
        let rows = huge.platforms.positions.len() as i64;
        assert!(rows <= MAX_GENERATED_END_Y / i64::from(ROW_SPACING_MIN) + 1);
        assert!(huge.platforms.positions.iter().all(|p| p.y < 1_000_000.0));

        let empty = generate(7, -50);
        assert_eq!(empty.end_y, 0);
        assert!(empty.platforms.positions.is_empty());
        assert!(empty.stars.positions.is_empty());
    }
}
