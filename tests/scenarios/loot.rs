//! Loot scenario tests
//!
//! Statistical checks run at least 10,000 trials and allow ±0.02

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ruincrawl::config::LootConfig;
use ruincrawl::entities::{Catalog, Creature, PlayerClass, KEY_ITEM_NAME};
use ruincrawl::loot::{LootDrop, LootGenerator};

const TRIALS: usize = 10_000;
const TOLERANCE: f64 = 0.02;

fn has_weapon(drops: &[LootDrop]) -> bool {
    drops
        .iter()
        .any(|d| matches!(d, LootDrop::Item(item) if item.as_weapon().is_some()))
}

/// Test: Weapons drop from about 30% of kills
#[test]
fn test_weapon_drop_rate() {
    let config = LootConfig::default();
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let creature = Creature::scaled("Skeleton", 8);

    let hits = (0..TRIALS)
        .filter(|_| has_weapon(&loot.kill_drops(&creature, &mut rng)))
        .count();
    let rate = hits as f64 / TRIALS as f64;

    assert!((rate - 0.30).abs() <= TOLERANCE, "weapon rate {}", rate);
}

/// Test: Observed weapon frequencies follow the rarity weights
#[test]
fn test_weapon_rarity_frequencies() {
    let config = LootConfig::default();
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let table = loot.weapon_table(PlayerClass::Mage, 10);

    let mut counts = vec![0usize; table.len()];
    for _ in 0..TRIALS * 2 {
        let index = table.roll_index(&mut rng).unwrap();
        counts[index] += 1;
    }

    for (index, count) in counts.iter().enumerate() {
        let observed = *count as f64 / (TRIALS * 2) as f64;
        let expected = table.probability(index);
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "{}: observed {} expected {}",
            table.entries()[index].item.name,
            observed,
            expected
        );
    }
}

/// Test: Junk sub-table follows its 60/30/10 weights
#[test]
fn test_junk_frequencies() {
    let config = LootConfig::default();
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let mut bronze = 0;
    let mut silver = 0;
    let mut gold = 0;
    for _ in 0..TRIALS {
        match loot.roll_junk(&mut rng).unwrap().name.as_str() {
            "Bronze Scrap" => bronze += 1,
            "Silver Rock" => silver += 1,
            "Gold Clump" => gold += 1,
            other => panic!("unexpected junk {}", other),
        }
    }

    let n = TRIALS as f64;
    assert!((bronze as f64 / n - 0.60).abs() <= TOLERANCE);
    assert!((silver as f64 / n - 0.30).abs() <= TOLERANCE);
    assert!((gold as f64 / n - 0.10).abs() <= TOLERANCE);
}

/// Test: Gold follows the creature's tier
#[test]
fn test_gold_by_tier() {
    let config = LootConfig::default();
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let gold_of = |drops: Vec<LootDrop>| -> u32 {
        drops
            .iter()
            .map(|d| match d {
                LootDrop::Gold(g) => *g,
                LootDrop::Item(_) => 0,
            })
            .sum()
    };

    for _ in 0..200 {
        let normal = gold_of(loot.kill_drops(&Creature::scaled("Goblin", 4), &mut rng));
        assert!((20..=60).contains(&normal), "normal gold {}", normal);

        let elite = gold_of(loot.kill_drops(&Creature::ruins_sentinel(), &mut rng));
        assert!((460..=920).contains(&elite), "elite gold {}", elite);

        let boss = gold_of(loot.kill_drops(&Creature::ancient_dragon(), &mut rng));
        assert_eq!(boss, 500);
    }
}

/// Test: The sentinel always drops the ruins key
#[test]
fn test_key_carrier_drops_key() {
    let config = LootConfig::default();
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(13);

    for _ in 0..50 {
        let drops = loot.kill_drops(&Creature::ruins_sentinel(), &mut rng);
        let keys = drops
            .iter()
            .filter(|d| matches!(d, LootDrop::Item(item) if item.name == KEY_ITEM_NAME))
            .count();
        assert_eq!(keys, 1);
    }
}

/// Test: Unique chest rows show up at most once per chest
#[test]
fn test_chest_unique_rows() {
    let config = LootConfig {
        chest_rolls: 5,
        ..LootConfig::default()
    };
    let catalog = Catalog::standard();
    let loot = LootGenerator::new(&config, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    for _ in 0..1000 {
        let drops = loot.chest(&[6, 8], &mut rng);
        assert_eq!(drops.len(), 5);
        let pouches = drops.iter().filter(|d| matches!(d, LootDrop::Gold(_))).count();
        let weapons = drops
            .iter()
            .filter(|d| matches!(d, LootDrop::Item(item) if item.as_weapon().is_some()))
            .count();
        assert!(pouches <= 1);
        assert!(weapons <= 1);
    }
}
