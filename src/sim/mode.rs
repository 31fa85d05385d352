//! The closed set of prey kinds
//!
//! A play mode is just the kind of prey on screen; every entity in a session
//! shares the mode's kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rgb;

/// Prey kind, which doubles as the play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Darting laser-style light
    #[default]
    Spark,
    /// Dangling toy on a string
    String,
    /// Scurrying mouse
    Rodent,
    /// Fluttering bird (sinks away when caught)
    Bird,
    /// Swimming fish
    Fish,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Spark,
        EntityKind::String,
        EntityKind::Rodent,
        EntityKind::Bird,
        EntityKind::Fish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Spark => "spark",
            EntityKind::String => "string",
            EntityKind::Rodent => "rodent",
            EntityKind::Bird => "bird",
            EntityKind::Fish => "fish",
        }
    }

    /// Number of entities alive at once in this mode
    pub fn population(&self) -> usize {
        match self {
            EntityKind::Spark => 1,
            _ => 3,
        }
    }

    /// Spawn (and respawn) size
    pub fn base_size(&self) -> f32 {
        match self {
            EntityKind::Spark => 18.0,
            EntityKind::String => 30.0,
            EntityKind::Rodent => 35.0,
            EntityKind::Bird => 45.0,
            EntityKind::Fish => 40.0,
        }
    }

    /// Body color, high contrast against the black background
    pub fn color(&self) -> [f32; 4] {
        match self {
            EntityKind::Spark => rgb(0x00f5ff),
            EntityKind::String => rgb(0xffbe0b),
            EntityKind::Rodent => rgb(0xffffff),
            EntityKind::Bird => rgb(0x3a86ff),
            EntityKind::Fish => rgb(0xffbe0b),
        }
    }

    /// Whether the dart/pause/jitter prey model drives this kind
    pub fn is_prey(&self) -> bool {
        matches!(self, EntityKind::Rodent | EntityKind::Bird | EntityKind::Fish)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spark" | "laser" => Ok(EntityKind::Spark),
            "string" | "rod-toy" | "yarn" => Ok(EntityKind::String),
            "rodent" | "mouse" => Ok(EntityKind::Rodent),
            "bird" => Ok(EntityKind::Bird),
            "fish" => Ok(EntityKind::Fish),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_aliases() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert_eq!("laser".parse::<EntityKind>().unwrap(), EntityKind::Spark);
        assert_eq!("Mouse".parse::<EntityKind>().unwrap(), EntityKind::Rodent);
        assert_eq!("rod-toy".parse::<EntityKind>().unwrap(), EntityKind::String);
    }

    #[test]
    fn test_unknown_mode_fails_fast() {
        let err = "dragon".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidMode(ref m) if m == "dragon"));
    }

    #[test]
    fn test_population() {
        assert_eq!(EntityKind::Spark.population(), 1);
        for kind in [EntityKind::String, EntityKind::Rodent, EntityKind::Bird, EntityKind::Fish] {
            assert_eq!(kind.population(), 3);
        }
    }
}
