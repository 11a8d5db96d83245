//! Dice notation
//!
//! Special-ability bonus damage is written as `NdS±M` ("1d5+2", "1d5-1",
//! "d6"). Rolls always use the caller's generator so a seeded session
//! replays identically.

use std::str::FromStr;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most dice accepted from notation
pub const MAX_DICE: u32 = 100;
/// Most sides per die accepted from notation
pub const MAX_SIDES: u32 = 1000;

static DICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*)d(\d+)(?:([+-])(\d+))?$").expect("valid regex"));

/// Rejected dice notation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("{0:?} is not dice notation (expected NdS, NdS+M or NdS-M)")]
    Syntax(String),

    #[error("{0:?} needs at least one die with at least one side")]
    Empty(String),

    #[error("{0:?} exceeds 100 dice or 1000 sides")]
    TooLarge(String),
}

/// A parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
    /// Flat amount added after summing the dice
    pub modifier: i32,
}

impl DiceRoll {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let sides = self.sides.clamp(1, i32::MAX as u32);
        (0..self.count)
            .map(|_| rng.random_range(1..=sides) as i32)
            .fold(self.modifier, i32::saturating_add)
    }

    /// Lowest possible result
    pub fn min(&self) -> i32 {
        saturating_i32(u64::from(self.count)).saturating_add(self.modifier)
    }

    /// Highest possible result
    pub fn max(&self) -> i32 {
        saturating_i32(u64::from(self.count) * u64::from(self.sides)).saturating_add(self.modifier)
    }
}

fn saturating_i32(n: u64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = s.trim().to_lowercase();
        let caps = DICE_REGEX
            .captures(&notation)
            .ok_or_else(|| DiceError::Syntax(s.to_string()))?;
        let number = |i: usize| caps.get(i).map(|m| m.as_str()).filter(|m| !m.is_empty());

        let count = match number(1) {
            Some(n) => n.parse().map_err(|_| DiceError::Syntax(s.to_string()))?,
            None => 1,
        };
        let sides: u32 = number(2)
            .unwrap_or_default()
            .parse()
            .map_err(|_| DiceError::Syntax(s.to_string()))?;
        let magnitude: i32 = match number(4) {
            Some(m) => m.parse().map_err(|_| DiceError::Syntax(s.to_string()))?,
            None => 0,
        };
        let modifier = if number(3) == Some("-") { -magnitude } else { magnitude };

        if count == 0 || sides == 0 {
            return Err(DiceError::Empty(s.to_string()));
        }
        if count > MAX_DICE || sides > MAX_SIDES {
            return Err(DiceError::TooLarge(s.to_string()));
        }
        Ok(Self::new(count, sides, modifier))
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> Self {
        roll.to_string()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}
