//! Progression scenario tests
//!
//! XP splits and level-ups through the ledger

use ruincrawl::config::GameConfig;
use ruincrawl::entities::{Player, PlayerClass};
use ruincrawl::progression::{split_xp, ProgressionLedger};

fn pair(config: &GameConfig) -> (Player, Player) {
    (
        Player::new("Aria", PlayerClass::Warrior, config).unwrap(),
        Player::new("Bram", PlayerClass::Ranger, config).unwrap(),
    )
}

/// Test: Odd totals give the extra point to the last hitter
#[test]
fn test_remainder_goes_to_last_hit() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let (mut a, mut b) = pair(&config);

    let report = ledger.distribute(&mut [&mut a, &mut b], &[0, 1], 71, Some(1));

    assert_eq!(report.amount_for(0), 35);
    assert_eq!(report.amount_for(1), 36);
    assert_eq!(a.xp + b.xp, 71);
}

/// Test: Without an eligible last hitter the first eligible player gets the extra point
#[test]
fn test_remainder_without_last_hit() {
    let awards = split_xp(71, &[0, 1], None);
    assert_eq!(awards[0].amount, 36);
    assert_eq!(awards[1].amount, 35);

    let awards = split_xp(71, &[1], Some(0));
    assert_eq!(awards.len(), 1);
    assert_eq!(awards[0].amount, 71);
}

/// Test: No XP is created or lost by splitting
#[test]
fn test_split_conserves_xp() {
    for total in 0..500 {
        for last_hit in [None, Some(0), Some(1), Some(7)] {
            for eligible in [&[0usize, 1][..], &[0][..], &[1][..]] {
                let sum: u32 = split_xp(total, eligible, last_hit).iter().map(|a| a.amount).sum();
                assert_eq!(sum, total, "total {} eligible {:?} last {:?}", total, eligible, last_hit);
            }
        }
    }
    assert!(split_xp(100, &[], Some(0)).is_empty());
}

/// Test: One big award crosses several levels and keeps the leftover
#[test]
fn test_multi_level_carry_over() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let (mut a, _) = pair(&config);
    let max_hp_before = a.max_hp;
    a.hp = 1;

    // level 5 needs 150, level 6 needs 180
    let levels = ledger.grant(&mut a, 150 + 180 + 20);

    assert_eq!(levels, Some((5, 7)));
    assert_eq!(a.level, 7);
    assert_eq!(a.xp, 20);
    assert_eq!(a.max_hp, max_hp_before + 20);
    assert_eq!(a.hp, a.max_hp);
}

/// Test: Levels stop at the cap and progress is discarded there
#[test]
fn test_level_cap() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let (mut a, _) = pair(&config);

    ledger.grant(&mut a, 1_000_000);
    assert_eq!(a.level, config.progression.max_level);
    assert_eq!(a.xp, 0);

    assert_eq!(ledger.grant(&mut a, 500), None);
    assert_eq!(a.level, config.progression.max_level);
    assert_eq!(a.xp, 0);
}

/// Test: The XP curve follows the configured multiplier
#[test]
fn test_custom_multiplier() {
    let mut config = GameConfig::default();
    config.progression.xp_multiplier = 10;
    let ledger = ProgressionLedger::new(&config);
    let (mut a, _) = pair(&config);

    assert_eq!(ledger.required_xp(5), 50);
    assert_eq!(ledger.grant(&mut a, 50), Some((5, 6)));
    assert_eq!(a.xp, 0);
}
