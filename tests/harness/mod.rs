//! Scenario test harness
//!
//! Shared fixtures for the engine scenarios:
//! - `TestParty` - players plus the rules and templates they fight under
//! - `Fight` - what one scripted combat session produced
//! - Creature builders with predictable stats
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::{dummy, TestParty};
//!
//! #[test]
//! fn test_one_hit() {
//!     let mut party = TestParty::new();
//!     let fight = party.fight(vec![dummy("Dummy", 1, 70)], &["1"], 1);
//!     assert_eq!(fight.report().xp.as_ref().unwrap().total, 70);
//! }
//! ```

mod creatures;

pub use creatures::{brute, dummy, poisoner};
pub use party::{Fight, TestParty};
