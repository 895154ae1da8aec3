//! Chemistry: the ordered rule set and the reaction engine.
//!
//! For every live cell, each rule is tried in registration order. A rule
//! that fires mutates the cell (and one partner) before the next rule is
//! tried, so a single cell can run through a chain of reactions in one tick.

use crate::population::Population;
use squirm_core::error::Result;
use squirm_core::occupancy::Occupancy;
use squirm_core::presets::Preset;
use squirm_core::reaction::{BondChange, ReactionRule};
use squirm_core::types::{CellId, Position};
use tracing::debug;

/// An ordered list of reaction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chemistry {
    rules: Vec<ReactionRule>,
}

impl Chemistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chemistry holding one of the built-in reaction sets.
    pub fn from_preset(preset: Preset) -> Result<Self> {
        let mut chemistry = Self::new();
        chemistry.extend(preset.rules()?);
        Ok(chemistry)
    }

    /// Append a rule; it is tried after every rule already registered.
    pub fn add_rule(&mut self, rule: ReactionRule) {
        debug!(%rule, index = self.rules.len(), "adding reaction");
        self.rules.push(rule);
    }

    /// Validate and append a rule given as its eight primitive fields.
    #[allow(clippy::too_many_arguments)]
    pub fn add_reaction(
        &mut self,
        us: &str,
        us_state: i64,
        bonded: bool,
        them: &str,
        them_state: i64,
        future_us_state: i64,
        bond_after: bool,
        future_them_state: i64,
    ) -> Result<()> {
        let rule = ReactionRule::from_fields(
            us,
            us_state,
            bonded,
            them,
            them_state,
            future_us_state,
            bond_after,
            future_them_state,
        )?;
        self.add_rule(rule);
        Ok(())
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = ReactionRule>) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    pub fn clear(&mut self) {
        debug!(dropped = self.rules.len(), "clearing reactions");
        self.rules.clear();
    }

    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule once against `id`. Returns how many rules fired.
    pub fn react(&self, population: &mut Population, id: CellId) -> usize {
        let mut fired = 0;
        for rule in &self.rules {
            if apply(rule, population, id) {
                fired += 1;
            }
        }
        fired
    }
}

/// Try one rule against one cell; true if it fired.
fn apply(rule: &ReactionRule, population: &mut Population, id: CellId) -> bool {
    let Some(cell) = population.get(id) else {
        return false;
    };
    let us_species = cell.species();
    if !rule.matches_us(us_species, cell.state()) {
        return false;
    }

    // Rebuilt per rule: a partner bonded by an earlier rule in this pass
    // has left the unbonded pool.
    let pool = if rule.bonded() {
        population.bond_partners(id)
    } else {
        population.unbonded_neighbours(id)
    };

    let partner = pool.into_iter().find(|&other| {
        population
            .get(other)
            .is_some_and(|them| rule.matches_them(us_species, them.species(), them.state()))
            && diagonal_clear(population, id, other)
    });
    let Some(partner) = partner else {
        return false;
    };

    match rule.bond_change() {
        BondChange::Make => population.bond(id, partner),
        BondChange::Break => population.unbond(id, partner),
        BondChange::Keep => {}
    }
    population.set_state(id, rule.future_us_state());
    population.set_state(partner, rule.future_them_state());
    debug!(%rule, "reaction fired");
    true
}

/// Can `us` and `them` interact across their offset?
///
/// Orthogonal neighbours always can. A diagonal pair is blocked only when
/// both flanking corners are occupied by cells bonded to each other, since
/// reacting would cross that bond.
fn diagonal_clear(population: &Population, us: CellId, them: CellId) -> bool {
    let (Some(a), Some(b)) = (population.get(us), population.get(them)) else {
        return false;
    };
    let (pa, pb) = (a.position(), b.position());
    if pa.is_orthogonal_to(&pb) {
        return true;
    }
    let grid = population.grid();
    let corner_one = grid.occupant(&Position::new(pa.x, pb.y));
    let corner_two = grid.occupant(&Position::new(pb.x, pa.y));
    match (corner_one, corner_two) {
        (Some(one), Some(two)) => !population.are_bonded(one, two),
        _ => true,
    }
}
