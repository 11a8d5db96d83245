//! Trading between owners
//!
//! - Merchant stock with buy and sell
//! - Player-to-player gifts
//! - Inventory commands (`equip`, `use`, `give`, `buy`, `sell`, `skip`)

mod commands;
mod merchant;

pub use commands::{execute, use_outside_combat, InventoryCommand};
pub use merchant::{give, Merchant, StockEntry};

use thiserror::Error;

use crate::entities::InventoryError;

/// Trade failures; nothing changes hands when one is returned
#[derive(Debug, Error, PartialEq)]
pub enum TradeError {
    #[error("not enough gold (costs {price}, have {gold})")]
    InsufficientGold { price: u32, gold: u32 },

    #[error("{0} cannot be sold")]
    Unsellable(String),

    #[error("{0} cannot be used outside combat")]
    NotUsable(String),

    #[error("no entry {}", .0 + 1)]
    InvalidIndex(usize),

    #[error("unknown command {0:?} (try equip N, use N, give N, buy N, sell N or skip)")]
    InvalidCommand(String),

    #[error("nobody to give items to")]
    NoPartner,

    #[error("no merchant here")]
    NoMerchant,

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
