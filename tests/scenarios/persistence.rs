//! Persistence scenario tests
//!
//! Save files on disk via tempfile

use std::fs;

use crate::harness::{dummy, TestParty};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ruincrawl::config::GameConfig;
use ruincrawl::entities::{Catalog, Item, Player, PlayerClass};
use ruincrawl::io::RecordingOutput;
use ruincrawl::save::{self, SaveError};
use ruincrawl::trade::Merchant;
use ruincrawl::Game;
use tempfile::TempDir;

/// Test: A party that fought, looted and traded comes back identical
#[test]
fn test_round_trip_after_play() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("save.json");

    let mut party = TestParty::new();
    party.fight(vec![dummy("Dummy", 1, 70)], &["1"], 21);
    let longsword = party.catalog.weapon("Iron Longsword").unwrap();
    let aria = party.player_mut(0);
    aria.death_count = 4;
    aria.inventory.add(Item::revive_token()).unwrap();
    aria.inventory.add(Item::weapon(longsword)).unwrap();
    let slot = aria.inventory.len() - 1;
    aria.equip(slot).unwrap();

    let mut merchant = Merchant::with_default_stock();
    let bram = party.player_mut(1);
    bram.inventory.add(Item::junk("Gold Clump", 10)).unwrap();
    let junk = bram.inventory.len() - 1;
    merchant.sell(bram, junk).unwrap();

    let players: Vec<&Player> = party.players.iter().collect();
    save::save_game(&path, &players, &merchant).unwrap();
    let loaded = save::load_game(&path, &party.catalog, &party.config).unwrap();

    assert_eq!(loaded.players, party.players);
    assert_eq!(loaded.merchant, merchant);
    let aria = &loaded.players[0];
    assert_eq!(aria.weapon.as_ref().unwrap().name, "Iron Longsword");
    let stowed = aria.inventory.position(|i| i.name == "Rusty Sword").unwrap();
    assert!(aria.inventory.get(stowed).unwrap().is_bound());
}

/// Test: The game facade saves and reloads through the same file
#[test]
fn test_game_facade_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("game.json");
    let config = GameConfig::default();
    let players = vec![
        Player::new("Aria", PlayerClass::Ranger, &config).unwrap(),
        Player::new("Bram", PlayerClass::Warrior, &config).unwrap(),
    ];
    let mut game = Game::new(config.clone(), players, Merchant::with_default_stock());
    let mut output = RecordingOutput::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    game.open_chest(0, &mut output, &mut rng);

    game.save(&path).unwrap();
    let reloaded = Game::load(&path, config).unwrap();

    assert_eq!(reloaded.players(), game.players());
    assert_eq!(reloaded.merchant(), game.merchant());
}

/// Test: A corrupt save fails as a whole and leaves live state alone
#[test]
fn test_failed_load_is_atomic() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("save.json");
    let config = GameConfig::default();
    let catalog = Catalog::standard();

    let mut party = TestParty::new();
    party.player_mut(0).gold = 500;
    let players: Vec<&Player> = party.players.iter().collect();
    save::save_game(&path, &players, &Merchant::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("\"gold\": 500", "\"gold\": 5000")).unwrap();

    let before = party.players.clone();
    let err = save::load_game(&path, &catalog, &config).unwrap_err();
    assert!(matches!(err, SaveError::ChecksumMismatch { .. }));
    assert_eq!(party.players, before);
}

/// Test: A record that breaks a rule is rejected even with a valid checksum
#[test]
fn test_invalid_record_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("save.json");
    let config = GameConfig::default();
    let catalog = Catalog::standard();

    let party = TestParty::new();
    let players: Vec<&Player> = party.players.iter().collect();
    let mut state = save::GameState::capture(&players, &Merchant::default());
    state.players[1].weapon = Some("Wooden Spoon".to_string());
    save::write_state(&path, &state).unwrap();

    let err = save::load_game(&path, &catalog, &config).unwrap_err();
    assert!(matches!(err, SaveError::UnknownWeapon(name) if name == "Wooden Spoon"));
}
