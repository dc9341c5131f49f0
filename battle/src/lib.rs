//! Battle setup domain for PokeArena.
//!
//! Everything here is synchronous and free of I/O. The async layer in
//! `pokearena-client` fetches data and hands it to these functions.
//!
//! # Overview
//!
//! ```text
//! pokearena-protocol (wire records)
//!        │
//!        ▼
//! pokearena-battle (validated types + battle setup) ← THIS CRATE
//!        │
//!        ▼
//! pokearena-client (data sources, sessions, orchestration)
//! ```
//!
//! # Main Types
//!
//! - [`Stats`], [`Battler`], [`OpponentSpecies`] - validated Pokemon data
//! - [`Ability`], [`Effect`] - catalog abilities and what they do
//! - [`Backpack`], [`Item`] - a user's inventory
//! - [`BattleSession`] - the lifecycle of one battle
//!
//! # Operations
//!
//! - [`balance`] - scale base stats to a reference level
//! - [`assign_random_ability`] - uniform pick from the catalog
//! - [`resolve_turn_order`] - speed comparison, ties go to the user
//! - [`prepare_battle`] - all three, atomically
//!
//! # Example Usage
//!
//! ```ignore
//! use pokearena_battle::{BattleSession, SessionView};
//!
//! let mut session = BattleSession::new();
//! session.begin(opponent.clone());
//! session.start(user, &opponent, &catalog, &mut rand::thread_rng())?;
//!
//! if let SessionView::Battle(state) = session.view() {
//!     println!("User goes first: {}", state.user_goes_first());
//! }
//! ```

pub mod assign;
pub mod balance;
pub mod error;
pub mod session;
pub mod turn;
pub mod types;

pub use assign::assign_random_ability;
pub use balance::{BalancedStats, balance, balanced_opponent, scaled_hp, scaled_stat};
pub use error::{BattleError, Result};
pub use session::{BattlePhase, BattleSession, BattleState, SessionView, prepare_battle};
pub use turn::{TurnOrder, resolve_turn_order};
pub use types::{
    Ability, Backpack, Battler, Effect, EffectType, Item, MAX_LEVEL, OpponentSpecies, Stat, Stats,
};
