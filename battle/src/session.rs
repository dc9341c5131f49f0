//! Battle session lifecycle
//!
//! ```text
//! NotStarted ──begin──> AwaitingSelection ──start──> InProgress ──conclude──> Concluded
//!                              ▲                                                  │
//!                              └──────────────────────begin───────────────────────┘
//! ```
//!
//! A session is owned by whoever holds it (usually a session store keyed by
//! session id). Nothing here is global.

use rand::Rng;

use crate::assign::assign_random_ability;
use crate::balance::balanced_opponent;
use crate::error::{BattleError, Result};
use crate::turn::{TurnOrder, resolve_turn_order};
use crate::types::{Ability, Battler, OpponentSpecies};

/// Everything a running battle needs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub user: Battler,

    /// Opponent scaled to the user's level, with its assigned ability
    pub opponent: Battler,

    /// Unscaled species data the opponent was built from
    pub opponent_base: OpponentSpecies,

    pub turn_order: TurnOrder,
}

impl BattleState {
    pub fn user_goes_first(&self) -> bool {
        self.turn_order.user_goes_first
    }

    /// Apply both battlers' ability effects
    pub fn trigger_abilities(&mut self) {
        self.user.trigger_abilities();
        self.opponent.trigger_abilities();
    }
}

/// Balance the opponent to the user's level, give it a random ability from
/// `catalog` and resolve turn order. Either all three succeed or nothing is
/// produced.
pub fn prepare_battle<R: Rng + ?Sized>(
    user: Battler,
    opponent: &OpponentSpecies,
    catalog: &[Ability],
    rng: &mut R,
) -> Result<BattleState> {
    let mut scaled = balanced_opponent(opponent, i64::from(user.level))?;
    scaled.abilities = vec![assign_random_ability(catalog, rng)?];

    let turn_order = resolve_turn_order(user.speed(), scaled.speed());

    Ok(BattleState {
        user,
        opponent: scaled,
        opponent_base: opponent.clone(),
        turn_order,
    })
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    NotStarted,

    /// An opponent was offered, waiting for the user to pick a Pokemon
    AwaitingSelection { opponent: OpponentSpecies },

    InProgress(Box<BattleState>),

    Concluded,
}

impl BattlePhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::AwaitingSelection { .. } => "awaiting selection",
            Self::InProgress(_) => "in progress",
            Self::Concluded => "concluded",
        }
    }
}

/// What the battle page should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView<'a> {
    Battle(&'a BattleState),

    /// No battle to show; send the user back to the lobby
    RedirectToStart,
}

/// One user's battle session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    phase: BattlePhase,
}

impl BattleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &BattlePhase {
        &self.phase
    }

    /// Offer a new opponent. Allowed from any phase; a running battle is dropped.
    pub fn begin(&mut self, opponent: OpponentSpecies) {
        self.phase = BattlePhase::AwaitingSelection { opponent };
    }

    /// Opponent offered in the lobby, if any
    pub fn offered_opponent(&self) -> Option<&OpponentSpecies> {
        match &self.phase {
            BattlePhase::AwaitingSelection { opponent } => Some(opponent),
            _ => None,
        }
    }

    /// Start the battle with the user's chosen Pokemon.
    ///
    /// Only valid while awaiting selection. On error the phase is unchanged.
    /// The submitted `opponent` is used as given; the one offered by `begin`
    /// is only shown in the lobby.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        user: Battler,
        opponent: &OpponentSpecies,
        catalog: &[Ability],
        rng: &mut R,
    ) -> Result<&BattleState> {
        if !matches!(self.phase, BattlePhase::AwaitingSelection { .. }) {
            return Err(BattleError::InvalidTransition {
                from: self.phase.name(),
                action: "start a battle",
            });
        }

        let state = prepare_battle(user, opponent, catalog, rng)?;
        self.phase = BattlePhase::InProgress(Box::new(state));

        match &self.phase {
            BattlePhase::InProgress(state) => Ok(&**state),
            _ => unreachable!("phase was just set to InProgress"),
        }
    }

    /// Finish the running battle, handing back its final state
    pub fn conclude(&mut self) -> Result<BattleState> {
        match std::mem::replace(&mut self.phase, BattlePhase::Concluded) {
            BattlePhase::InProgress(state) => Ok(*state),
            other => {
                let from = other.name();
                self.phase = other;
                Err(BattleError::InvalidTransition {
                    from,
                    action: "conclude",
                })
            }
        }
    }

    pub fn state(&self) -> Option<&BattleState> {
        match &self.phase {
            BattlePhase::InProgress(state) => Some(&**state),
            _ => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut BattleState> {
        match &mut self.phase {
            BattlePhase::InProgress(state) => Some(&mut **state),
            _ => None,
        }
    }

    /// Battle page view. Having no battle is not an error.
    pub fn view(&self) -> SessionView<'_> {
        match self.state() {
            Some(state) => SessionView::Battle(state),
            None => SessionView::RedirectToStart,
        }
    }
}
