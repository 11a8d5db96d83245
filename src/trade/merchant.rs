//! Merchant stock and item transfers
//!
//! Every transfer moves an item out of one owner and into another. All
//! checks (index, gold, sellability, capacity) run before anything moves.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TradeError;
use crate::entities::{Catalog, InventoryError, Item, Player};

/// One item on offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub item: Item,
    pub price: u32,
}

/// A merchant that buys and sells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Merchant {
    stock: Vec<StockEntry>,
}

impl Merchant {
    pub fn new(stock: Vec<StockEntry>) -> Self {
        Self { stock }
    }

    /// The stock a merchant opens with
    pub fn with_default_stock() -> Self {
        Self::new(
            Catalog::merchant_stock()
                .into_iter()
                .map(|(item, price)| StockEntry { item, price })
                .collect(),
        )
    }

    pub fn stock(&self) -> &[StockEntry] {
        &self.stock
    }

    /// Numbered listing for the shop menu
    pub fn listing(&self) -> Vec<String> {
        self.stock
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}) {} - {} gold", i + 1, e.item, e.price))
            .collect()
    }

    /// Move stock entry `index` to the player for its price
    pub fn buy(&mut self, player: &mut Player, index: usize) -> Result<StockEntry, TradeError> {
        let entry = self.stock.get(index).ok_or(TradeError::InvalidIndex(index))?;
        if player.gold < entry.price {
            return Err(TradeError::InsufficientGold {
                price: entry.price,
                gold: player.gold,
            });
        }
        if player.inventory.is_full() {
            return Err(InventoryError::Full {
                capacity: player.inventory.capacity(),
                rejected: Box::new(entry.item.clone()),
            }
            .into());
        }

        let entry = self.stock.remove(index);
        player.gold -= entry.price;
        player.inventory.add(entry.item.clone())?;
        info!(player = %player.name, item = %entry.item.name, price = entry.price, "bought");
        Ok(entry)
    }

    /// Price the merchant would pay for the player's item in `index`
    pub fn quote(&self, player: &Player, index: usize) -> Result<u32, TradeError> {
        let item = player
            .inventory
            .get(index)
            .ok_or(TradeError::InvalidIndex(index))?;
        item.sell_price()
            .ok_or_else(|| TradeError::Unsellable(item.name.clone()))
    }

    /// Move the player's item in `index` into stock; returns the gold paid
    pub fn sell(&mut self, player: &mut Player, index: usize) -> Result<u32, TradeError> {
        let price = self.quote(player, index)?;
        let item = player.inventory.take_tradeable(index)?;
        let resell = item.resell_price().unwrap_or(price);
        player.gold = player.gold.saturating_add(price);
        info!(player = %player.name, item = %item.name, price, resell, "sold");
        self.stock.push(StockEntry { item, price: resell });
        Ok(price)
    }
}

/// Move the giver's item in `index` to the receiver
pub fn give(giver: &mut Player, receiver: &mut Player, index: usize) -> Result<Item, TradeError> {
    let item = giver
        .inventory
        .get(index)
        .ok_or(TradeError::InvalidIndex(index))?;
    if item.is_bound() {
        return Err(InventoryError::Bound(item.name.clone()).into());
    }
    if receiver.inventory.is_full() {
        return Err(InventoryError::Full {
            capacity: receiver.inventory.capacity(),
            rejected: Box::new(item.clone()),
        }
        .into());
    }

    let item = giver.inventory.take_tradeable(index)?;
    receiver.inventory.add(item.clone())?;
    info!(from = %giver.name, to = %receiver.name, item = %item.name, "item given");
    Ok(item)
}
