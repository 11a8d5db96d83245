//! Trade scenario tests
//!
//! Merchant, gifts and equipment between encounters

use ruincrawl::config::GameConfig;
use ruincrawl::entities::{Catalog, InventoryError, Item, Player, PlayerClass};
use ruincrawl::trade::{Merchant, TradeError};
use ruincrawl::Game;

fn game() -> Game {
    let config = GameConfig::default();
    let players = vec![
        Player::new("Aria", PlayerClass::Warrior, &config).unwrap(),
        Player::new("Bram", PlayerClass::Ranger, &config).unwrap(),
    ];
    Game::new(config, players, Merchant::with_default_stock())
}

/// Test: Buying a revive token and handing it over moves it exactly once
#[test]
fn test_buy_then_give_token() {
    let mut game = game();
    game.players_mut()[0].gold = 350;

    let line = game.inventory_command(0, "buy 5", true).unwrap();
    assert_eq!(line, "Aria buys Revive Token for 300 gold.");
    assert_eq!(game.players()[0].gold, 50);

    game.inventory_command(0, "give 1", false).unwrap();
    assert!(game.players()[0].inventory.is_empty());
    assert_eq!(game.players()[1].inventory.count_where(Item::is_revive_token), 1);
    assert_eq!(game.merchant().stock().len(), 4);
}

/// Test: Failed trades change nothing
#[test]
fn test_failed_trades_are_no_ops() {
    let mut game = game();
    game.players_mut()[0].gold = 10;
    game.players_mut()[0]
        .inventory
        .add(Item::weapon(Catalog::starter_weapon(PlayerClass::Warrior)))
        .unwrap();
    let before = game.players().to_vec();

    assert_eq!(
        game.inventory_command(0, "buy 1", true),
        Err(TradeError::InsufficientGold { price: 30, gold: 10 })
    );
    assert!(matches!(
        game.inventory_command(0, "sell 1", true),
        Err(TradeError::Unsellable(_))
    ));
    assert!(matches!(
        game.inventory_command(0, "give 1", false),
        Err(TradeError::Inventory(InventoryError::Bound(_)))
    ));
    assert!(matches!(
        game.inventory_command(0, "give 9", false),
        Err(TradeError::InvalidIndex(8))
    ));
    assert!(matches!(
        game.inventory_command(0, "juggle 1", false),
        Err(TradeError::InvalidCommand(_))
    ));

    assert_eq!(game.players(), &before[..]);
    assert_eq!(game.merchant().stock().len(), 5);
}

/// Test: Equipping checks class and level, and swaps the old weapon into the slot
#[test]
fn test_equip_requirements_and_swap() {
    let mut game = game();
    let catalog = Catalog::standard();
    let aria = &mut game.players_mut()[0];
    aria.inventory.add(Item::weapon(catalog.weapon("Shortbow").unwrap())).unwrap();
    aria.inventory.add(Item::weapon(catalog.weapon("Berserker Axe").unwrap())).unwrap();
    aria.inventory.add(Item::weapon(catalog.weapon("Iron Longsword").unwrap())).unwrap();

    assert!(matches!(
        game.inventory_command(0, "equip 1", false),
        Err(TradeError::Inventory(InventoryError::RequirementUnmet { .. }))
    ));
    assert!(matches!(
        game.inventory_command(0, "equip 2", false),
        Err(TradeError::Inventory(InventoryError::RequirementUnmet { .. }))
    ));

    let line = game.inventory_command(0, "equip 3", false).unwrap();
    assert_eq!(line, "Aria equips Iron Longsword (stowing Rusty Sword).");
    let aria = &game.players()[0];
    assert_eq!(aria.weapon.as_ref().unwrap().name, "Iron Longsword");
    assert_eq!(aria.inventory.get(2).unwrap().name, "Rusty Sword");
    assert_eq!(aria.weapon_bonus(), 8);
}

/// Test: Selling a weapon puts it in stock at the resell price
#[test]
fn test_sold_weapon_restocked() {
    let mut game = game();
    let catalog = Catalog::standard();
    game.players_mut()[1]
        .inventory
        .add(Item::weapon(catalog.weapon("Composite Bow").unwrap()))
        .unwrap();

    let line = game.inventory_command(1, "sell 1", true).unwrap();
    assert_eq!(line, "Bram sells Composite Bow for 80 gold.");
    let restocked = game.merchant().stock().last().unwrap();
    assert_eq!(restocked.item.name, "Composite Bow");
    assert_eq!(restocked.price, 96);

    game.players_mut()[0].gold = 100;
    game.inventory_command(0, "buy 6", true).unwrap();
    assert_eq!(game.players()[0].gold, 4);
}

/// Test: Out-of-combat item use only covers HP and MP potions
#[test]
fn test_use_between_encounters() {
    let mut game = game();
    let aria = &mut game.players_mut()[0];
    aria.hp = 10;
    aria.inventory.add(Catalog::greater_health_potion()).unwrap();
    aria.inventory.add(Catalog::phoenix_feather()).unwrap();

    let line = game.inventory_command(0, "use 1", false).unwrap();
    assert_eq!(line, "Aria uses Greater Health Potion and restores 50 HP.");
    assert_eq!(game.players()[0].hp, 60);
    assert!(matches!(
        game.inventory_command(0, "use 1", false),
        Err(TradeError::NotUsable(_))
    ));
}
