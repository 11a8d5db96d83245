//! Inventory and shop commands
//!
//! Text commands typed between encounters. Slot numbers are 1-based on the
//! wire and 0-based once parsed.

use std::str::FromStr;

use super::merchant::{give, Merchant};
use super::TradeError;
use crate::entities::{Consumable, Player};

/// A parsed inventory or shop command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryCommand {
    Equip(usize),
    Use(usize),
    Give(usize),
    Buy(usize),
    Sell(usize),
    Skip,
}

impl FromStr for InventoryCommand {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().unwrap_or("").to_lowercase();
        if verb == "skip" || verb.is_empty() {
            return Ok(InventoryCommand::Skip);
        }

        let slot = parts
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| TradeError::InvalidCommand(s.trim().to_string()))?;

        match verb.as_str() {
            "equip" => Ok(InventoryCommand::Equip(slot)),
            "use" => Ok(InventoryCommand::Use(slot)),
            "give" => Ok(InventoryCommand::Give(slot)),
            "buy" => Ok(InventoryCommand::Buy(slot)),
            "sell" => Ok(InventoryCommand::Sell(slot)),
            _ => Err(TradeError::InvalidCommand(s.trim().to_string())),
        }
    }
}

/// Use a consumable between encounters
///
/// Only HP and MP restoration make sense outside a fight.
pub fn use_outside_combat(player: &mut Player, index: usize) -> Result<String, TradeError> {
    let item = player
        .inventory
        .get(index)
        .ok_or(TradeError::InvalidIndex(index))?;
    let (amount, pool) = match item.use_effect() {
        Some(Consumable::HealHp(amount)) => (amount, "HP"),
        Some(Consumable::RestoreMp(amount)) => (amount, "MP"),
        _ => return Err(TradeError::NotUsable(item.name.clone())),
    };

    let item = player.inventory.remove(index)?;
    let gained = if pool == "HP" {
        player.heal(amount)
    } else {
        player.restore_mp(amount)
    };
    Ok(format!("{} uses {} and restores {} {}.", player.name, item.name, gained, pool))
}

/// Run one command for `actor`
///
/// `partner` is the other player (for `give`); `merchant` is present only
/// while a shop is open. Returns the line to show.
pub fn execute(
    command: InventoryCommand,
    actor: &mut Player,
    partner: Option<&mut Player>,
    merchant: Option<&mut Merchant>,
) -> Result<String, TradeError> {
    match command {
        InventoryCommand::Skip => Ok(format!("{} skips.", actor.name)),
        InventoryCommand::Equip(index) => {
            let previous = actor.equip(index)?;
            let equipped = actor.weapon.as_ref().map(|w| w.name.clone()).unwrap_or_default();
            Ok(match previous {
                Some(old) => format!("{} equips {} (stowing {}).", actor.name, equipped, old),
                None => format!("{} equips {}.", actor.name, equipped),
            })
        }
        InventoryCommand::Use(index) => use_outside_combat(actor, index),
        InventoryCommand::Give(index) => {
            let partner = partner.ok_or(TradeError::NoPartner)?;
            let item = give(actor, partner, index)?;
            Ok(format!("{} gives {} to {}.", actor.name, item.name, partner.name))
        }
        InventoryCommand::Buy(index) => {
            let merchant = merchant.ok_or(TradeError::NoMerchant)?;
            let entry = merchant.buy(actor, index)?;
            Ok(format!("{} buys {} for {} gold.", actor.name, entry.item.name, entry.price))
        }
        InventoryCommand::Sell(index) => {
            let merchant = merchant.ok_or(TradeError::NoMerchant)?;
            let name = actor
                .inventory
                .get(index)
                .map(|i| i.name.clone())
                .unwrap_or_default();
            let price = merchant.sell(actor, index)?;
            Ok(format!("{} sells {} for {} gold.", actor.name, name, price))
        }
    }
}
