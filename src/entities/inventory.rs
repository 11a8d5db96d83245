//! Slot inventories
//!
//! An ordered list of items with a hard capacity. Every mutation either
//! fully succeeds or leaves the inventory untouched.

use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use super::item::Item;

/// Inventory mutation failures
#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("inventory is full ({capacity} slots)")]
    Full { capacity: usize, rejected: Box<Item> },

    #[error("no item in slot {}", .0 + 1)]
    InvalidIndex(usize),

    #[error("{0} is bound and cannot leave its owner")]
    Bound(String),

    #[error("{0} is not a weapon")]
    NotAWeapon(String),

    #[error("cannot equip {name}: {reason}")]
    RequirementUnmet { name: String, reason: String },
}

/// Fixed-capacity ordered item list
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Build from saved items, rejecting a list that does not fit
    pub fn from_items(items: Vec<Item>, capacity: usize) -> Result<Self, InventoryError> {
        if items.len() > capacity {
            let rejected = items[capacity].clone();
            return Err(InventoryError::Full {
                capacity,
                rejected: Box::new(rejected),
            });
        }
        Ok(Self { items, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Append an item; a full inventory hands it back inside the error
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.is_full() {
            return Err(InventoryError::Full {
                capacity: self.capacity,
                rejected: Box::new(item),
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Item, InventoryError> {
        if index >= self.items.len() {
            return Err(InventoryError::InvalidIndex(index));
        }
        Ok(self.items.remove(index))
    }

    /// Remove an item that is leaving its owner (trade, sale, gift)
    pub fn take_tradeable(&mut self, index: usize) -> Result<Item, InventoryError> {
        let item = self.get(index).ok_or(InventoryError::InvalidIndex(index))?;
        if item.is_bound() {
            return Err(InventoryError::Bound(item.name.clone()));
        }
        self.remove(index)
    }

    /// Put `item` into slot `index`, returning what was there
    pub fn replace(&mut self, index: usize, item: Item) -> Result<Item, InventoryError> {
        let slot = self
            .items
            .get_mut(index)
            .ok_or(InventoryError::InvalidIndex(index))?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn position<P: Fn(&Item) -> bool>(&self, predicate: P) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    pub fn count_where<P: Fn(&Item) -> bool>(&self, predicate: P) -> usize {
        self.items.iter().filter(|i| predicate(i)).count()
    }

    /// Slots holding usable consumables, in order
    pub fn consumable_slots(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.use_effect().is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Consume one Revive Token, if any
    pub fn take_revive_token(&mut self) -> Option<Item> {
        let index = self.position(Item::is_revive_token)?;
        Some(self.items.remove(index))
    }

    /// Remove up to `count` random items that are not protected from loss
    ///
    /// Removed items are returned in their former inventory order.
    pub fn lose_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Item> {
        let candidates: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_protected_from_loss())
            .map(|(i, _)| i)
            .collect();

        let mut picks: Vec<usize> = candidates
            .choose_multiple(rng, count.min(candidates.len()))
            .copied()
            .collect();
        // highest index first so earlier indices stay valid
        picks.sort_unstable_by(|a, b| b.cmp(a));

        let mut removed: Vec<Item> = picks.into_iter().map(|i| self.items.remove(i)).collect();
        removed.reverse();
        removed
    }
}
