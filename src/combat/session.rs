//! Combat session
//!
//! The turn-based state machine for one encounter. Players act in turn
//! order, then every living enemy responds; the end condition is checked
//! after every action. Decisions come from an [`InputSource`], narration
//! goes to an [`OutputSink`], and every roll uses the injected generator.
//!
//! When the session ends it applies the consequences:
//! - Victory: kill drops to the loot recipient, then XP to the survivors
//! - Flee: nothing is distributed
//! - Defeat: the death penalty policy for every fallen player
//!
//! After Victory or Flee, fallen players are carried out at 1 HP. Players
//! already down when the session starts sit it out and are left untouched.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use thiserror::Error;
use tracing::{debug, info};

use super::ai::TargetCandidate;
use super::damage::{special_damage, strike_damage, DamageKind, DamageModifier, DamageResult};
use super::effects::{EffectRegistry, EffectType, StatusEffect};
use super::state::{Combatant, Outcome, Phase, PlayerAction};
use crate::config::GameConfig;
use crate::death::{DeathPenaltyPolicy, DeathReport};
use crate::entities::{Catalog, Consumable, Creature, Player};
use crate::io::{confirm, InputSource, OutputSink};
use crate::loot::{LootDrop, LootGenerator};
use crate::progression::{ProgressionLedger, XpReport};

/// Bad decisions inside a turn; the player is asked again and keeps the turn
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Invalid choice {0:?}. Enter 1-5.")]
    InvalidChoice(String),

    #[error("Invalid target {0:?}.")]
    InvalidTarget(String),

    #[error("{0} is already dead. Pick a living target.")]
    DeadTarget(String),

    #[error("No usable items.")]
    NoItems,

    #[error("Invalid item slot {0:?}.")]
    InvalidItem(String),

    #[error("{0} cannot be used here.")]
    NotUsable(String),

    #[error("Not enough MP for {name} (needs {needed}, has {available}).")]
    InsufficientMp { name: String, needed: i32, available: i32 },

    #[error("No fallen ally to revive.")]
    NoFallenAlly,

    #[error("Cancelled.")]
    Cancelled,
}

/// Failures that stop the session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("input closed while waiting for a decision")]
    InputClosed,
}

/// Why a turn attempt did not complete
enum Interrupt {
    Action(ActionError),
    Session(SessionError),
}

impl From<ActionError> for Interrupt {
    fn from(e: ActionError) -> Self {
        Interrupt::Action(e)
    }
}

impl From<SessionError> for Interrupt {
    fn from(e: SessionError) -> Self {
        Interrupt::Session(e)
    }
}

/// One drop handed (or not) to a player
#[derive(Debug, Clone, PartialEq)]
pub struct LootAward {
    /// Index of the recipient in turn order
    pub player: usize,
    pub drop: LootDrop,
    /// False when the item did not fit and was left behind
    pub accepted: bool,
}

/// Everything a finished session did
#[derive(Debug, Clone, PartialEq)]
pub struct CombatReport {
    pub outcome: Outcome,
    /// Completed rounds plus the one in progress at the end
    pub rounds: u32,
    /// Present only on Victory
    pub xp: Option<XpReport>,
    pub loot: Vec<LootAward>,
    pub deaths: Vec<DeathReport>,
    /// Players carried out at 1 HP after Victory or Flee
    pub carried_out: Vec<usize>,
}

impl CombatReport {
    /// Items that did not fit anywhere
    pub fn left_behind(&self) -> impl Iterator<Item = &LootAward> {
        self.loot.iter().filter(|a| !a.accepted)
    }

    /// Gold handed out by this session
    pub fn gold_awarded(&self) -> u32 {
        self.loot
            .iter()
            .map(|a| match a.drop {
                LootDrop::Gold(g) => g,
                LootDrop::Item(_) => 0,
            })
            .sum()
    }
}

/// A single encounter between a party and a group of creatures
pub struct CombatSession<'a> {
    config: &'a GameConfig,
    catalog: &'a Catalog,
    players: Vec<&'a mut Player>,
    /// Players standing when the session began, or revived during it
    participants: Vec<bool>,
    enemies: Vec<Creature>,
    input: &'a mut dyn InputSource,
    output: &'a mut dyn OutputSink,
    rng: &'a mut dyn RngCore,
    effects: EffectRegistry,
    phase: Phase,
    /// Player who landed the most recent killing blow
    last_hit: Option<usize>,
    round: u32,
    announced: bool,
}

impl<'a> CombatSession<'a> {
    pub fn new(
        config: &'a GameConfig,
        catalog: &'a Catalog,
        players: Vec<&'a mut Player>,
        enemies: Vec<Creature>,
        input: &'a mut dyn InputSource,
        output: &'a mut dyn OutputSink,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        let participants = players.iter().map(|p| p.is_alive()).collect();
        let mut session = Self {
            config,
            catalog,
            players,
            participants,
            enemies,
            input,
            output,
            rng,
            effects: EffectRegistry::new(),
            phase: Phase::Resolving,
            last_hit: None,
            round: 1,
            announced: false,
        };
        session.phase = session.first_phase_of_round();
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_hit(&self) -> Option<usize> {
        self.last_hit
    }

    pub fn enemies(&self) -> &[Creature] {
        &self.enemies
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index).map(|p| &**p)
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// Advance the state machine by one transition
    pub fn step(&mut self) -> Result<Phase, SessionError> {
        self.announce();
        match self.phase {
            Phase::PlayerTurn(i) => {
                self.player_turn(i)?;
                if !self.phase.is_ended() {
                    self.phase = self.next_phase(Combatant::Player(i));
                }
            }
            Phase::EnemyTurn(j) => {
                self.enemy_turn(j);
                self.phase = self.next_phase(Combatant::Enemy(j));
            }
            Phase::Resolving => {
                self.round += 1;
                self.phase = self.first_phase_of_round();
                if !self.phase.is_ended() {
                    self.say(format!("-- Round {} --", self.round));
                }
            }
            Phase::Ended(_) => {}
        }
        Ok(self.phase)
    }

    /// Play the encounter to the end and apply its consequences
    pub fn run(mut self) -> Result<CombatReport, SessionError> {
        loop {
            if let Phase::Ended(outcome) = self.phase {
                return Ok(self.resolve(outcome));
            }
            self.step()?;
        }
    }

    fn announce(&mut self) {
        if self.announced {
            return;
        }
        self.announced = true;
        info!(
            players = self.players.len(),
            enemies = self.enemies.len(),
            "combat started"
        );
        self.say("Combat starts!");
        let lines: Vec<String> = self.enemies.iter().map(|e| format!(" - {}", e)).collect();
        for line in lines {
            self.say(line);
        }
    }

    fn say(&mut self, line: impl AsRef<str>) {
        self.output.emit(line.as_ref());
    }

    fn read(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.input.read_line(prompt).ok_or(SessionError::InputClosed)
    }

    fn confirm(&mut self, question: &str) -> Result<bool, SessionError> {
        confirm(&mut *self.input, &mut *self.output, question).ok_or(SessionError::InputClosed)
    }

    fn check_end(&self) -> Option<Outcome> {
        if self.enemies.iter().all(|e| !e.is_alive()) {
            Some(Outcome::Victory)
        } else if self.players.iter().all(|p| !p.is_alive()) {
            Some(Outcome::Defeat)
        } else {
            None
        }
    }

    fn first_living_player(&self, from: usize) -> Option<usize> {
        (from..self.players.len()).find(|&i| self.players[i].is_alive())
    }

    fn first_living_enemy(&self, from: usize) -> Option<usize> {
        (from..self.enemies.len()).find(|&j| self.enemies[j].is_alive())
    }

    fn first_phase_of_round(&self) -> Phase {
        if let Some(outcome) = self.check_end() {
            return Phase::Ended(outcome);
        }
        self.first_living_player(0)
            .map(Phase::PlayerTurn)
            .or_else(|| self.first_living_enemy(0).map(Phase::EnemyTurn))
            .unwrap_or(Phase::Resolving)
    }

    fn next_phase(&self, after: Combatant) -> Phase {
        if let Some(outcome) = self.check_end() {
            return Phase::Ended(outcome);
        }
        match after {
            Combatant::Player(i) => self
                .first_living_player(i + 1)
                .map(Phase::PlayerTurn)
                .or_else(|| self.first_living_enemy(0).map(Phase::EnemyTurn))
                .unwrap_or(Phase::Resolving),
            Combatant::Enemy(j) => self
                .first_living_enemy(j + 1)
                .map(Phase::EnemyTurn)
                .unwrap_or(Phase::Resolving),
        }
    }

    // ---- player turns ----

    fn player_turn(&mut self, i: usize) -> Result<(), SessionError> {
        if !self.players[i].is_alive() {
            return Ok(());
        }
        let start = self.effects.begin_turn(Combatant::Player(i));
        if start.poison_damage > 0 {
            let hit = DamageResult::new(start.poison_damage, DamageKind::Poison, DamageModifier::Normal);
            let lost = self.players[i].take_damage(hit.final_damage);
            self.say(format!("{} suffers {} poison damage.", self.players[i].name, lost));
            if !self.players[i].is_alive() {
                self.player_fell(i);
                return Ok(());
            }
        }
        if start.expired.contains(&EffectType::Poisoned) {
            self.say(format!("The poison wears off {}.", self.players[i].name));
        }

        loop {
            let p = &self.players[i];
            let status = format!(
                "{}'s turn (Lv{}) HP:{}/{} MP:{}/{}",
                p.name, p.level, p.hp, p.max_hp, p.mp, p.max_mp
            );
            self.say(status);
            self.say(" 1) Attack  2) Defend  3) Use Item  4) Special  5) Run");
            let line = self.read("Action (1-5): ")?;
            match self.perform(i, &line) {
                Ok(()) => return Ok(()),
                Err(Interrupt::Action(e)) => {
                    debug!(player = i, error = %e, "action rejected");
                    self.say(e.to_string());
                }
                Err(Interrupt::Session(e)) => return Err(e),
            }
        }
    }

    fn perform(&mut self, i: usize, line: &str) -> Result<(), Interrupt> {
        let mut parts = line.split_whitespace();
        let choice = parts.next().unwrap_or("");
        let arg = parts.next();
        let action: PlayerAction = choice
            .parse()
            .map_err(|_| ActionError::InvalidChoice(line.to_string()))?;

        match action {
            PlayerAction::Attack => self.attack(i, arg),
            PlayerAction::Defend => {
                self.effects.add_effect(Combatant::Player(i), StatusEffect::defending());
                self.say(format!("{} braces for the next blow.", self.players[i].name));
                Ok(())
            }
            PlayerAction::UseItem => self.use_item(i, arg),
            PlayerAction::Special => self.special(i),
            PlayerAction::Run => self.run_away(i),
        }
    }

    fn select_enemy(&mut self, arg: Option<&str>) -> Result<usize, Interrupt> {
        let raw = match arg {
            Some(a) => a.to_string(),
            None if self.enemies.len() == 1 => "1".to_string(),
            None => {
                let lines: Vec<String> = self
                    .enemies
                    .iter()
                    .enumerate()
                    .map(|(n, e)| {
                        if e.is_alive() {
                            format!("{}) {}", n + 1, e)
                        } else {
                            format!("{}) {} [dead]", n + 1, e.name)
                        }
                    })
                    .collect();
                for line in lines {
                    self.say(line);
                }
                self.read("Target #: ")?
            }
        };

        let index = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&j| j < self.enemies.len())
            .ok_or_else(|| ActionError::InvalidTarget(raw.clone()))?;
        if !self.enemies[index].is_alive() {
            return Err(ActionError::DeadTarget(self.enemies[index].name.clone()).into());
        }
        Ok(index)
    }

    fn attack_power(&self, i: usize) -> i32 {
        self.players[i].attack + self.effects.magnitude(Combatant::Player(i), EffectType::Empowered)
    }

    fn attack(&mut self, i: usize, arg: Option<&str>) -> Result<(), Interrupt> {
        let j = self.select_enemy(arg)?;
        let base = strike_damage(
            self.attack_power(i),
            self.players[i].weapon_bonus(),
            self.enemies[j].defense,
        );
        self.hit_enemy(i, j, base, DamageKind::Strike);
        Ok(())
    }

    /// Apply a player's hit to an enemy and record a kill
    fn hit_enemy(&mut self, i: usize, j: usize, base: i32, kind: DamageKind) {
        let who = Combatant::Enemy(j);
        let modifier = DamageModifier::for_defending(self.effects.consume(who, EffectType::Defending));
        let hit = DamageResult::new(base, kind, modifier);
        let lost = self.enemies[j].take_damage(hit.final_damage);
        self.say(format!(
            "{} hits {} for {} damage.",
            self.players[i].name, self.enemies[j].name, lost
        ));
        if !self.enemies[j].is_alive() {
            self.last_hit = Some(i);
            self.effects.clear(who);
            info!(enemy = %self.enemies[j].name, by = %self.players[i].name, "enemy killed");
            self.say(format!("{} dies!", self.enemies[j].name));
        }
    }

    fn special(&mut self, i: usize) -> Result<(), Interrupt> {
        let special = self.config.classes.profile(self.players[i].class).special.clone();
        let available = self.players[i].mp;
        if !self.players[i].spend_mp(special.mp_cost) {
            return Err(ActionError::InsufficientMp {
                name: special.name,
                needed: special.mp_cost,
                available,
            }
            .into());
        }

        let living: Vec<usize> = (0..self.enemies.len())
            .filter(|&j| self.enemies[j].is_alive())
            .collect();
        let targets: Vec<usize> = if special.area {
            living
        } else {
            living.choose(&mut *self.rng).copied().into_iter().collect()
        };

        self.say(format!("{} uses {}!", self.players[i].name, special.name));
        for j in targets {
            let bonus = special.bonus.roll(&mut *self.rng);
            let base = special_damage(self.attack_power(i), special.multiplier_tenths, bonus);
            self.hit_enemy(i, j, base, DamageKind::Special);
        }
        Ok(())
    }

    fn use_item(&mut self, i: usize, arg: Option<&str>) -> Result<(), Interrupt> {
        let slots = self.players[i].inventory.consumable_slots();
        if slots.is_empty() {
            return Err(ActionError::NoItems.into());
        }

        let raw = match arg {
            Some(a) => a.to_string(),
            None => {
                let lines: Vec<String> = slots
                    .iter()
                    .filter_map(|&s| {
                        self.players[i]
                            .inventory
                            .get(s)
                            .map(|item| format!("{}) {}", s + 1, item))
                    })
                    .collect();
                for line in lines {
                    self.say(line);
                }
                self.read("Use item #: ")?
            }
        };

        let slot = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| ActionError::InvalidItem(raw.clone()))?;
        let item = self.players[i]
            .inventory
            .get(slot)
            .ok_or_else(|| ActionError::InvalidItem(raw.clone()))?;
        let effect = item
            .use_effect()
            .ok_or_else(|| ActionError::NotUsable(item.name.clone()))?;
        let name = item.name.clone();

        // pick the revive target before anything is consumed
        let revive_target = match effect {
            Consumable::Revive(_) => Some(
                (0..self.players.len())
                    .find(|&k| k != i && !self.players[k].is_alive())
                    .ok_or(ActionError::NoFallenAlly)?,
            ),
            Consumable::Cure if !self.effects.has_effect(Combatant::Player(i), EffectType::Poisoned) => {
                return Err(ActionError::NotUsable(name).into());
            }
            _ => None,
        };

        if self.config.combat.confirm_actions && !self.confirm(&format!("Use {}?", name))? {
            return Err(ActionError::Cancelled.into());
        }

        self.players[i]
            .inventory
            .remove(slot)
            .map_err(|_| ActionError::InvalidItem(raw.clone()))?;
        self.apply_consumable(i, &name, effect, revive_target);
        Ok(())
    }

    fn apply_consumable(&mut self, i: usize, name: &str, effect: Consumable, revive_target: Option<usize>) {
        let user = self.players[i].name.clone();
        match effect {
            Consumable::HealHp(amount) => {
                let gained = self.players[i].heal(amount);
                self.say(format!("{} uses {} and restores {} HP.", user, name, gained));
            }
            Consumable::RestoreMp(amount) => {
                let gained = self.players[i].restore_mp(amount);
                self.say(format!("{} uses {} and restores {} MP.", user, name, gained));
            }
            Consumable::Cure => {
                self.effects.cure(Combatant::Player(i));
                self.say(format!("{} uses {} and is cured.", user, name));
            }
            Consumable::Empower(bonus) => {
                let turns = self.config.combat.buff_turns;
                self.effects
                    .add_effect(Combatant::Player(i), StatusEffect::empowered(turns, bonus));
                self.say(format!("{} uses {} (+{} attack).", user, name, bonus));
            }
            Consumable::Revive(percent) => {
                if let Some(k) = revive_target {
                    self.players[k].restore_to_percent(percent);
                    self.participants[k] = true;
                    self.effects.clear(Combatant::Player(k));
                    info!(player = %self.players[k].name, "revived in combat");
                    self.say(format!(
                        "{} uses {}: {} rises with {} HP!",
                        user, name, self.players[k].name, self.players[k].hp
                    ));
                }
            }
        }
    }

    fn run_away(&mut self, i: usize) -> Result<(), Interrupt> {
        if self.config.combat.confirm_actions && !self.confirm("Attempt to flee?")? {
            return Err(ActionError::Cancelled.into());
        }
        let fled = self.rng.random_bool(self.config.combat.flee_chance);
        info!(player = %self.players[i].name, fled, "flee attempt");
        if fled {
            self.say(format!("{} successfully flees from combat!", self.players[i].name));
            self.phase = Phase::Ended(Outcome::Flee);
        } else {
            self.say(format!("{} fails to flee.", self.players[i].name));
        }
        Ok(())
    }

    fn player_fell(&mut self, i: usize) {
        self.effects.clear(Combatant::Player(i));
        info!(player = %self.players[i].name, "player fell");
        self.say(format!("{} has fallen!", self.players[i].name));
    }

    // ---- enemy turns ----

    fn enemy_turn(&mut self, j: usize) {
        if !self.enemies[j].is_alive() {
            return;
        }
        self.effects.begin_turn(Combatant::Enemy(j));

        let candidates: Vec<TargetCandidate> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .map(|(index, p)| TargetCandidate { index, hp: p.hp })
            .collect();
        let strategy = self.enemies[j].strategy;
        let Some(i) = strategy.choose_target(&candidates, &mut *self.rng) else {
            return;
        };

        let target = Combatant::Player(i);
        let defending = self.effects.consume(target, EffectType::Defending);
        let base = strike_damage(self.enemies[j].attack, 0, self.players[i].defense);
        let hit = DamageResult::new(base, DamageKind::Strike, DamageModifier::for_defending(defending));
        let lost = self.players[i].take_damage(hit.final_damage);

        let mut line = format!(
            "{} attacks {} for {} damage.",
            self.enemies[j].name, self.players[i].name, lost
        );
        if hit.was_defended() {
            line.push_str(" (defended)");
        }
        self.say(line);

        if !self.players[i].is_alive() {
            self.player_fell(i);
        } else if self.enemies[j].venom > 0 {
            let poison = StatusEffect::poisoned(self.config.combat.poison_turns, self.enemies[j].venom);
            self.effects.add_effect(target, poison);
            self.say(format!("{} is poisoned!", self.players[i].name));
        }
    }

    // ---- resolution ----

    fn resolve(mut self, outcome: Outcome) -> CombatReport {
        info!(%outcome, rounds = self.round, "combat ended");
        self.say(format!("Combat ended: {}.", outcome));

        let mut report = CombatReport {
            outcome,
            rounds: self.round,
            xp: None,
            loot: Vec::new(),
            deaths: Vec::new(),
            carried_out: Vec::new(),
        };

        match outcome {
            Outcome::Victory => {
                report.loot = self.distribute_loot();
                report.xp = Some(self.distribute_xp());
                report.carried_out = self.carry_out_fallen();
            }
            Outcome::Flee => {
                report.carried_out = self.carry_out_fallen();
            }
            Outcome::Defeat => {
                report.deaths = self.apply_death_penalties();
            }
        }
        report
    }

    /// Last-hit player if standing, else the first survivor
    fn loot_recipient(&self) -> Option<usize> {
        self.last_hit
            .filter(|&i| i < self.players.len() && self.players[i].is_alive())
            .or_else(|| self.first_living_player(0))
    }

    fn distribute_loot(&mut self) -> Vec<LootAward> {
        let Some(recipient) = self.loot_recipient() else {
            return Vec::new();
        };
        let generator = LootGenerator::new(&self.config.loot, self.catalog);
        let mut awards = Vec::new();

        for j in 0..self.enemies.len() {
            if self.enemies[j].is_alive() {
                continue;
            }
            for drop in generator.kill_drops(&self.enemies[j], &mut *self.rng) {
                let accepted = self.give_drop(recipient, &drop);
                awards.push(LootAward {
                    player: recipient,
                    drop,
                    accepted,
                });
            }
        }
        awards
    }

    fn give_drop(&mut self, recipient: usize, drop: &LootDrop) -> bool {
        let (accepted, line) = drop.award_to(&mut *self.players[recipient]);
        self.say(line);
        accepted
    }

    fn distribute_xp(&mut self) -> XpReport {
        let total: u32 = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| e.xp_value)
            .sum();
        let eligible: Vec<usize> = (0..self.players.len())
            .filter(|&i| self.players[i].is_alive())
            .collect();

        let ledger = ProgressionLedger::new(self.config);
        let report = ledger.distribute(&mut self.players, &eligible, total, self.last_hit);

        for award in &report.awards {
            let line = format!("{} gains {} XP.", self.players[award.player].name, award.amount);
            self.say(line);
        }
        for up in &report.level_ups {
            self.say(format!("{} leveled up! Level {} -> {}.", up.name, up.from, up.to));
        }
        report
    }

    fn carry_out_fallen(&mut self) -> Vec<usize> {
        let mut carried = Vec::new();
        for i in 0..self.players.len() {
            if self.participants[i] && !self.players[i].is_alive() {
                self.players[i].hp = 1;
                carried.push(i);
                self.say(format!("{} is carried out with 1 HP.", self.players[i].name));
            }
        }
        carried
    }

    fn apply_death_penalties(&mut self) -> Vec<DeathReport> {
        let policy = DeathPenaltyPolicy::new(&self.config.death);
        let mut reports = Vec::new();
        for i in 0..self.players.len() {
            if !self.participants[i] || self.players[i].is_alive() {
                continue;
            }
            let outcome = policy.apply(&mut *self.players[i], &mut *self.rng);
            let report = DeathReport {
                player: i,
                name: self.players[i].name.clone(),
                outcome,
            };
            for line in report.describe() {
                self.say(line);
            }
            reports.push(report);
        }
        reports
    }
}
