//! Combat scenario tests
//!
//! Full sessions from the first prompt to the resolved report

use crate::harness::{brute, dummy, poisoner, TestParty};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ruincrawl::combat::{CombatSession, EnemyStrategy, Outcome, SessionError};
use ruincrawl::config::GameConfig;
use ruincrawl::death::DeathOutcome;
use ruincrawl::entities::{Catalog, Item, Player, PlayerClass};
use ruincrawl::io::{RecordingOutput, ScriptedInput};

/// Test: Both survivors split 70 XP evenly
#[test]
fn test_victory_splits_xp_between_survivors() {
    let mut party = TestParty::new();
    let enemies = vec![dummy("Dummy A", 1, 35), dummy("Dummy B", 1, 35)];

    let fight = party.fight(enemies, &["1 1", "1 2"], 1);
    let report = fight.report();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.rounds, 1);
    let xp = report.xp.as_ref().unwrap();
    assert_eq!(xp.total, 70);
    assert_eq!(xp.amount_for(0), 35);
    assert_eq!(xp.amount_for(1), 35);
    assert_eq!(party.player(0).xp, 35);
    assert_eq!(party.player(1).xp, 35);
    assert_eq!(fight.unread, 0);
}

/// Test: A partner already down sits the fight out untouched
#[test]
fn test_downed_partner_sits_out() {
    let mut party = TestParty::new();
    party.player_mut(0).hp = 0;

    let fight = party.fight(vec![dummy("Dummy", 1, 50)], &["1"], 2);
    let report = fight.report();

    assert_eq!(report.outcome, Outcome::Victory);
    let xp = report.xp.as_ref().unwrap();
    assert_eq!(xp.amount_for(0), 0);
    assert_eq!(xp.amount_for(1), 50);
    assert!(report.carried_out.is_empty());
    assert_eq!(party.player(0).hp, 0);
    assert_eq!(party.player(0).xp, 0);
    assert_eq!(party.player(1).xp, 50);
}

/// Test: A player fighting alone takes all XP; the partner outside is unchanged
#[test]
fn test_solo_participant_takes_all_xp() {
    let config = GameConfig::default();
    let catalog = Catalog::standard();
    let mut a = Player::new("Aria", PlayerClass::Warrior, &config).unwrap();
    let b = Player::new("Bram", PlayerClass::Mage, &config).unwrap();
    let (b_xp, b_hp) = (b.xp, b.hp);

    let mut input = ScriptedInput::new(["1"]);
    let mut output = RecordingOutput::new();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let session = CombatSession::new(
        &config,
        &catalog,
        vec![&mut a],
        vec![dummy("Dummy", 1, 50)],
        &mut input,
        &mut output,
        &mut rng,
    );
    let report = session.run().unwrap();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.xp.as_ref().unwrap().amount_for(0), 50);
    assert_eq!(a.xp, 50);
    assert_eq!(b.xp, b_xp);
    assert_eq!(b.hp, b_hp);
}

/// Test: Defending softens one blow; the second enemy hits in full
#[test]
fn test_defend_covers_one_hit_per_stance() {
    let mut party = TestParty::solo(PlayerClass::Warrior);
    party.config.combat.flee_chance = 1.0;
    let mut first = dummy("Brute A", 500, 5);
    first.attack = 40;
    let mut second = dummy("Brute B", 500, 5);
    second.attack = 40;

    // 40 vs defense 13: 27 full, 13 defended
    let fight = party.fight(vec![first, second], &["2", "5"], 13);

    assert_eq!(fight.report().outcome, Outcome::Flee);
    assert_eq!(fight.output.count_containing("(defended)"), 1);
    assert_eq!(party.player(0).hp, 130 - 13 - 27);
}

/// Test: Loot goes to the player who landed the last hit
#[test]
fn test_loot_goes_to_last_hit() {
    let mut party = TestParty::new();
    let enemies = vec![dummy("Dummy A", 1, 10), dummy("Dummy B", 1, 10)];

    let fight = party.fight(enemies, &["1 1", "1 2"], 3);
    let report = fight.report();

    assert!(!report.loot.is_empty());
    assert!(report.loot.iter().all(|award| award.player == 1));
    assert_eq!(party.player(1).gold, report.gold_awarded());
    assert_eq!(party.player(0).gold, 0);
}

/// Test: Picking a dead target reprompts and keeps the turn
#[test]
fn test_dead_target_reprompts() {
    let mut party = TestParty::new();
    let enemies = vec![dummy("Dummy A", 1, 5), dummy("Dummy B", 1, 5)];

    let fight = party.fight(enemies, &["1 1", "1 1", "1 2"], 4);

    assert_eq!(fight.report().outcome, Outcome::Victory);
    assert!(fight.output.contains("Dummy A is already dead"));
    assert_eq!(fight.report().rounds, 1);
    assert_eq!(fight.unread, 0);
}

/// Test: Nonsense input is rejected without losing the turn
#[test]
fn test_invalid_choice_reprompts() {
    let mut party = TestParty::solo(PlayerClass::Ranger);

    let fight = party.fight(vec![dummy("Dummy", 1, 5)], &["9", "dance", "1"], 5);

    assert_eq!(fight.report().outcome, Outcome::Victory);
    assert_eq!(fight.output.count_containing("Invalid choice"), 2);
}

/// Test: The mage's area special hits every enemy
#[test]
fn test_area_special_clears_group() {
    let mut party = TestParty::new();
    let enemies = vec![
        dummy("Dummy A", 1, 10),
        dummy("Dummy B", 1, 10),
        dummy("Dummy C", 1, 10),
    ];
    let mp_before = party.player(1).mp;

    let fight = party.fight(enemies, &["2", "4"], 6);

    assert_eq!(fight.report().outcome, Outcome::Victory);
    assert!(fight.output.contains("Bram uses Arcane Burst!"));
    assert_eq!(fight.output.count_containing("dies!"), 3);
    assert_eq!(party.player(1).mp, mp_before - 8);
}

/// Test: A guaranteed flee distributes nothing
#[test]
fn test_flee_distributes_nothing() {
    let mut party = TestParty::new();
    party.config.combat.flee_chance = 1.0;

    let fight = party.fight(vec![dummy("Dummy", 1000, 99)], &["5"], 7);
    let report = fight.report();

    assert_eq!(report.outcome, Outcome::Flee);
    assert!(report.xp.is_none());
    assert!(report.loot.is_empty());
    assert!(report.deaths.is_empty());
    assert!(party.players.iter().all(|p| p.xp == 0 && p.gold == 0));
}

/// Test: A wiped party goes through the death policy
#[test]
fn test_defeat_applies_death_policy() {
    let mut party = TestParty::new();
    party.player_mut(0).gold = 10;
    party.player_mut(0).death_count = 2;
    party.player_mut(1).inventory.add(Item::revive_token()).unwrap();

    let fight = party.fight(vec![brute("Ogre")], &["2", "2", "2", "2"], 8);
    let report = fight.report();

    assert_eq!(report.outcome, Outcome::Defeat);
    assert!(report.xp.is_none());
    assert_eq!(report.deaths.len(), 2);
    assert_eq!(
        report.deaths[0].outcome,
        DeathOutcome::Penalized {
            gold_lost: 3,
            death_count: 3,
            items_lost: Vec::new(),
            hp: 65,
        }
    );
    assert_eq!(report.deaths[1].outcome, DeathOutcome::Revived { hp: 40 });

    let aria = party.player(0);
    assert_eq!(aria.gold, 7);
    assert_eq!(aria.death_count, 3);
    let bram = party.player(1);
    assert_eq!(bram.death_count, 0);
    assert!(bram.inventory.is_empty());
}

/// Test: Cunning enemies go for the weakest player
#[test]
fn test_weakest_strategy_targets_lowest_hp() {
    let mut party = TestParty::new();
    party.config.combat.flee_chance = 1.0;
    party.player_mut(0).hp = 20;
    let enemy = brute("Wight").with_strategy(EnemyStrategy::Weakest);

    let fight = party.fight(vec![enemy], &["2", "2", "5"], 9);

    assert!(fight.output.contains("Wight attacks Aria"));
    assert!(fight.output.contains("Aria has fallen!"));
    assert!(!fight.output.contains("Wight attacks Bram"));
    assert_eq!(fight.report().outcome, Outcome::Flee);
    assert_eq!(fight.report().carried_out, vec![0]);
}

/// Test: Venom poisons on hit and ticks at the start of the victim's turn
#[test]
fn test_poison_ticks_at_turn_start() {
    let mut party = TestParty::solo(PlayerClass::Warrior);
    party.config.combat.flee_chance = 1.0;

    let fight = party.fight(vec![poisoner("Giant Rat", 3)], &["2", "5"], 10);

    assert!(fight.output.contains("Solo is poisoned!"));
    assert!(fight.output.contains("Solo suffers 3 poison damage."));
    assert_eq!(fight.report().outcome, Outcome::Flee);
}

/// Test: Running out of input stops the session with an error
#[test]
fn test_closed_input_is_reported() {
    let mut party = TestParty::new();

    let fight = party.fight(vec![dummy("Dummy", 10, 5)], &[], 11);

    assert_eq!(fight.result.unwrap_err(), SessionError::InputClosed);
}
