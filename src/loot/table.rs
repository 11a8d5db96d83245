//! Weighted rarity tables
//!
//! A table maps templates to drop weights; a smaller weight is rarer. Each
//! roll samples one entry with probability `weight / total_weight`. Entries
//! flagged unique are drawn at most once per [`LootTable::roll_many`] call.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// One row of a loot table
#[derive(Debug, Clone, PartialEq)]
pub struct LootEntry<T> {
    pub item: T,
    pub weight: f64,
    pub unique: bool,
}

/// Weighted table of templates
#[derive(Debug, Clone, PartialEq)]
pub struct LootTable<T> {
    entries: Vec<LootEntry<T>>,
}

impl<T> Default for LootTable<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> LootTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repeatable entry
    pub fn with(mut self, item: T, weight: f64) -> Self {
        self.push(item, weight, false);
        self
    }

    /// Add an entry drawn at most once per multi-roll
    pub fn with_unique(mut self, item: T, weight: f64) -> Self {
        self.push(item, weight, true);
        self
    }

    /// Negative or non-finite weights are stored as zero (never drawn)
    pub fn push(&mut self, item: T, weight: f64, unique: bool) {
        let weight = if weight.is_finite() && weight > 0.0 { weight } else { 0.0 };
        self.entries.push(LootEntry { item, weight, unique });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LootEntry<T>] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Expected frequency of entry `index`
    pub fn probability(&self, index: usize) -> f64 {
        let total = self.total_weight();
        match self.entries.get(index) {
            Some(entry) if total > 0.0 => entry.weight / total,
            _ => 0.0,
        }
    }

    /// Sample one entry index; None for an empty or weightless table
    pub fn roll_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        self.pick(&[], rng)
    }

    /// Sample one entry
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.roll_index(rng).map(|i| &self.entries[i].item)
    }

    /// Independent rolls; unique entries leave the pool once drawn
    pub fn roll_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&T> {
        let mut drawn = Vec::new();
        let mut excluded = Vec::new();
        for _ in 0..count {
            let Some(index) = self.pick(&excluded, rng) else {
                break;
            };
            if self.entries[index].unique {
                excluded.push(index);
            }
            drawn.push(&self.entries[index].item);
        }
        drawn
    }

    fn pick<R: Rng + ?Sized>(&self, excluded: &[usize], rng: &mut R) -> Option<usize> {
        let weights = self.entries.iter().enumerate().map(|(i, e)| {
            if excluded.contains(&i) {
                0.0
            } else {
                e.weight
            }
        });
        // fails only when nothing has positive weight
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(rng))
    }
}

impl<T: Clone> LootTable<T> {
    /// Sample one entry and clone it out of the table
    pub fn roll_cloned<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        self.roll(rng).cloned()
    }
}
