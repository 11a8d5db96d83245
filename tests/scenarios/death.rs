//! Death scenario tests
//!
//! The penalty policy applied to fallen players

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ruincrawl::config::{DeathConfig, GameConfig};
use ruincrawl::death::{DeathOutcome, DeathPenaltyPolicy};
use ruincrawl::entities::{Catalog, Item, Player, PlayerClass};

fn fallen() -> Player {
    let mut p = Player::new("Aria", PlayerClass::Mage, &GameConfig::default()).unwrap();
    p.hp = 0;
    p
}

/// Test: A token saves everything but itself
#[test]
fn test_revive_token_replaces_penalty() {
    let config = DeathConfig::default();
    let policy = DeathPenaltyPolicy::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut p = fallen();
    p.gold = 50;
    p.death_count = 4;
    p.inventory.add(Catalog::lesser_health_potion()).unwrap();
    p.inventory.add(Item::revive_token()).unwrap();
    p.inventory.add(Item::revive_token()).unwrap();

    let outcome = policy.apply(&mut p, &mut rng);

    assert_eq!(outcome, DeathOutcome::Revived { hp: 40 });
    assert_eq!(p.gold, 50);
    assert_eq!(p.death_count, 4);
    assert_eq!(p.inventory.len(), 2);
    assert_eq!(p.inventory.count_where(Item::is_revive_token), 1);
}

/// Test: Second death to third costs three gold
#[test]
fn test_third_death_costs_three_gold() {
    let config = DeathConfig::default();
    let policy = DeathPenaltyPolicy::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut p = fallen();
    p.gold = 100;
    p.death_count = 2;

    let DeathOutcome::Penalized { gold_lost, death_count, hp, .. } = policy.apply(&mut p, &mut rng) else {
        panic!("expected a penalty");
    };

    assert_eq!(gold_lost, 3);
    assert_eq!(death_count, 3);
    assert_eq!(p.gold, 97);
    assert_eq!(hp, 40);
    assert_eq!(p.hp, 40);
}

/// Test: The gold penalty is capped and never drives gold negative
#[test]
fn test_gold_penalty_cap_and_floor() {
    let config = DeathConfig::default();
    let policy = DeathPenaltyPolicy::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut rich = fallen();
    rich.gold = 1000;
    rich.death_count = 75;
    policy.apply(&mut rich, &mut rng);
    assert_eq!(rich.gold, 970);
    assert_eq!(rich.death_count, 76);

    let mut poor = fallen();
    poor.gold = 2;
    poor.death_count = 9;
    policy.apply(&mut poor, &mut rng);
    assert_eq!(poor.gold, 0);
}

/// Test: One to three unprotected items go; bound and super-rare items stay
#[test]
fn test_item_loss_spares_protected_items() {
    let config = DeathConfig::default();
    let policy = DeathPenaltyPolicy::new(&config);
    let catalog = Catalog::standard();

    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut p = fallen();
        let equipped = p.weapon.clone();
        p.inventory.add(Item::weapon(Catalog::starter_weapon(PlayerClass::Warrior))).unwrap();
        p.inventory.add(Item::weapon(catalog.weapon("Archmage Focus").unwrap())).unwrap();
        p.inventory.add(Item::quest("Torn Map").bound()).unwrap();
        for _ in 0..5 {
            p.inventory.add(Item::junk("Bronze Scrap", 2)).unwrap();
        }

        let DeathOutcome::Penalized { items_lost, .. } = policy.apply(&mut p, &mut rng) else {
            panic!("expected a penalty");
        };

        assert!((1..=3).contains(&items_lost.len()), "seed {}", seed);
        assert!(items_lost.iter().all(|name| name == "Bronze Scrap"));
        assert_eq!(p.inventory.len(), 8 - items_lost.len());
        assert!(p.inventory.position(|i| i.name == "Rusty Sword").is_some());
        assert!(p.inventory.position(|i| i.name == "Archmage Focus").is_some());
        assert!(p.inventory.position(|i| i.name == "Torn Map").is_some());
        assert_eq!(p.weapon, equipped);
    }
}

/// Test: A custom respawn percentage is honored, with a floor of 1 HP
#[test]
fn test_respawn_percent() {
    let config = DeathConfig {
        respawn_hp_percent: 0,
        ..DeathConfig::default()
    };
    let policy = DeathPenaltyPolicy::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut p = fallen();

    policy.apply(&mut p, &mut rng);
    assert_eq!(p.hp, 1);
}
