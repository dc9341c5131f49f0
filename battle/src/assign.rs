//! Random ability assignment
//!
//! The random source is always passed in, so tests can seed it.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{BattleError, Result};
use crate::types::{Ability, Battler};

/// Pick one ability uniformly at random from `catalog`
pub fn assign_random_ability<R: Rng + ?Sized>(catalog: &[Ability], rng: &mut R) -> Result<Ability> {
    catalog
        .choose(rng)
        .cloned()
        .ok_or(BattleError::EmptyCatalog)
}

impl Battler {
    /// Replace this battler's abilities with one picked from `catalog`
    pub fn assign_random_ability<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Ability],
        rng: &mut R,
    ) -> Result<&Ability> {
        let ability = assign_random_ability(catalog, rng)?;
        self.abilities = vec![ability];
        Ok(&self.abilities[0])
    }
}
