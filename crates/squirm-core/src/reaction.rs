//! Reaction rules: the declarative transitions of the chemistry.
//!
//! A rule reads as "a cell of kind `us` in state `us_state`, currently
//! (un)bonded to a partner of kind `them` in state `them_state`, becomes
//! `future_us_state`, (un)bonds, and turns the partner into
//! `future_them_state`".
//!
//! Rules have a compact text form, the same one the historical applet
//! printed when a reaction was registered:
//!
//! ```text
//! e8 e0 => e4-e3     unbonded e8 meets e0: both change state and bond
//! x4-y1 => x2-y5     any x4 bonded to any y1: change states, stay bonded
//! ```
//!
//! A `-` between the two halves means "bonded", a space means "not bonded".
//!
//! ```rust
//! use squirm_core::reaction::ReactionRule;
//!
//! let rule: ReactionRule = "e8 e0 => e4-e3".parse().unwrap();
//! assert_eq!(rule.us_state(), 8);
//! assert!(rule.bond_after());
//! assert_eq!(rule.to_string(), "e8 e0 => e4-e3");
//! ```

use crate::error::{RuleError, RuleSide, Result, SquirmError};
use crate::types::{validate_state, Species, State};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which reacting cells a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsPattern {
    /// Exactly this species.
    Exactly(Species),
    /// Any species (`x`); only the state has to match.
    Any,
}

/// Which partners a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemPattern {
    /// Exactly this species.
    Exactly(Species),
    /// `x`: the reacting cell's own species when `us` is also `x`,
    /// otherwise any species.
    SameAsUs,
    /// `y`: any species.
    Any,
}

impl UsPattern {
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'x' => Ok(UsPattern::Any),
            'y' => Err(RuleError::WildcardNotAllowed {
                side: RuleSide::Us,
                code,
            }
            .into()),
            other => Species::from_code(other).map(UsPattern::Exactly),
        }
    }

    pub fn code(self) -> char {
        match self {
            UsPattern::Exactly(species) => species.code(),
            UsPattern::Any => 'x',
        }
    }
}

impl ThemPattern {
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'x' => Ok(ThemPattern::SameAsUs),
            'y' => Ok(ThemPattern::Any),
            other => Species::from_code(other).map(ThemPattern::Exactly),
        }
    }

    pub fn code(self) -> char {
        match self {
            ThemPattern::Exactly(species) => species.code(),
            ThemPattern::SameAsUs => 'x',
            ThemPattern::Any => 'y',
        }
    }
}

/// What a rule does to the bond between the two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondChange {
    Make,
    Break,
    Keep,
}

/// An immutable, validated reaction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionRule {
    us: UsPattern,
    us_state: State,
    bonded: bool,
    them: ThemPattern,
    them_state: State,
    future_us_state: State,
    bond_after: bool,
    future_them_state: State,
}

impl ReactionRule {
    /// Build a rule from already-typed parts. Cannot fail.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        us: UsPattern,
        us_state: State,
        bonded: bool,
        them: ThemPattern,
        them_state: State,
        future_us_state: State,
        bond_after: bool,
        future_them_state: State,
    ) -> Self {
        Self {
            us,
            us_state,
            bonded,
            them,
            them_state,
            future_us_state,
            bond_after,
            future_them_state,
        }
    }

    /// Build a rule from the eight primitive fields, validating species
    /// codes and rejecting negative states.
    #[allow(clippy::too_many_arguments)]
    pub fn from_fields(
        us: &str,
        us_state: i64,
        bonded: bool,
        them: &str,
        them_state: i64,
        future_us_state: i64,
        bond_after: bool,
        future_them_state: i64,
    ) -> Result<Self> {
        let us = UsPattern::from_code(single_code(us)?)?;
        let them = ThemPattern::from_code(single_code(them)?)?;
        Ok(Self::new(
            us,
            validate_state("us_state", us_state)?,
            bonded,
            them,
            validate_state("them_state", them_state)?,
            validate_state("future_us_state", future_us_state)?,
            bond_after,
            validate_state("future_them_state", future_them_state)?,
        ))
    }

    pub fn us(&self) -> UsPattern {
        self.us
    }

    pub fn us_state(&self) -> State {
        self.us_state
    }

    /// Whether the pair must currently be bonded.
    pub fn bonded(&self) -> bool {
        self.bonded
    }

    pub fn them(&self) -> ThemPattern {
        self.them
    }

    pub fn them_state(&self) -> State {
        self.them_state
    }

    pub fn future_us_state(&self) -> State {
        self.future_us_state
    }

    /// Whether the pair is bonded after the reaction.
    pub fn bond_after(&self) -> bool {
        self.bond_after
    }

    pub fn future_them_state(&self) -> State {
        self.future_them_state
    }

    pub fn bond_change(&self) -> BondChange {
        match (self.bonded, self.bond_after) {
            (false, true) => BondChange::Make,
            (true, false) => BondChange::Break,
            _ => BondChange::Keep,
        }
    }

    /// Does a cell of this species and state qualify as the reacting cell?
    pub fn matches_us(&self, species: Species, state: State) -> bool {
        if state != self.us_state {
            return false;
        }
        match self.us {
            UsPattern::Exactly(wanted) => wanted == species,
            UsPattern::Any => true,
        }
    }

    /// Does a partner qualify, given the reacting cell's species?
    pub fn matches_them(&self, us_species: Species, species: Species, state: State) -> bool {
        if state != self.them_state {
            return false;
        }
        match (self.them, self.us) {
            (ThemPattern::Exactly(wanted), _) => wanted == species,
            (ThemPattern::SameAsUs, UsPattern::Any) => species == us_species,
            (ThemPattern::SameAsUs, UsPattern::Exactly(_)) | (ThemPattern::Any, _) => true,
        }
    }
}

fn single_code(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => Ok(code),
        _ => Err(RuleError::MalformedCode(text.to_string()).into()),
    }
}

fn bond_mark(bonded: bool) -> char {
    if bonded {
        '-'
    } else {
        ' '
    }
}

impl fmt::Display for ReactionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let us = self.us.code();
        let them = self.them.code();
        write!(
            f,
            "{us}{}{}{them}{} => {us}{}{}{them}{}",
            self.us_state,
            bond_mark(self.bonded),
            self.them_state,
            self.future_us_state,
            bond_mark(self.bond_after),
            self.future_them_state,
        )
    }
}

/// One half of the notation: `e8-a1` or `e8 a1`.
struct Half {
    us: char,
    us_state: State,
    bonded: bool,
    them: char,
    them_state: State,
}

fn parse_half(rule: &str, text: &str) -> Result<Half> {
    let syntax = |reason: &str| SquirmError::rule_syntax(rule, reason);

    let mut chars = text.chars().peekable();
    let us = chars.next().ok_or_else(|| syntax("missing species"))?;

    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    let us_state = digits
        .parse::<State>()
        .map_err(|_| syntax("expected a state after the first species"))?;

    let bonded = match chars.next() {
        Some('-') => true,
        Some(' ') => false,
        _ => return Err(syntax("expected '-' or ' ' between the two cells")),
    };

    let them = chars.next().ok_or_else(|| syntax("missing partner species"))?;
    let rest: String = chars.collect();
    let them_state = rest
        .parse::<State>()
        .map_err(|_| syntax("expected a state after the partner species"))?;

    Ok(Half {
        us,
        us_state,
        bonded,
        them,
        them_state,
    })
}

impl FromStr for ReactionRule {
    type Err = SquirmError;

    fn from_str(text: &str) -> Result<Self> {
        let (before, after) = text
            .split_once("=>")
            .ok_or_else(|| SquirmError::rule_syntax(text, "missing '=>'"))?;
        let before = parse_half(text, before.trim())?;
        let after = parse_half(text, after.trim())?;

        if before.us != after.us || before.them != after.them {
            return Err(SquirmError::rule_syntax(
                text,
                "species must be the same on both sides",
            ));
        }

        Ok(Self::new(
            UsPattern::from_code(before.us)?,
            before.us_state,
            before.bonded,
            ThemPattern::from_code(before.them)?,
            before.them_state,
            after.us_state,
            after.bonded,
            after.them_state,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fields_accepts_valid_rule() {
        let rule = ReactionRule::from_fields("e", 8, false, "e", 0, 4, true, 3).unwrap();
        assert_eq!(rule.us(), UsPattern::Exactly(Species::E));
        assert_eq!(rule.them(), ThemPattern::Exactly(Species::E));
        assert_eq!(rule.bond_change(), BondChange::Make);
    }

    #[test]
    fn from_fields_rejects_bad_species() {
        let err = ReactionRule::from_fields("g", 1, false, "e", 0, 1, false, 1).unwrap_err();
        assert_eq!(err, SquirmError::Rule(RuleError::UnknownSpecies('g')));

        let err = ReactionRule::from_fields("e", 1, false, "z", 0, 1, false, 1).unwrap_err();
        assert_eq!(err, SquirmError::Rule(RuleError::UnknownSpecies('z')));

        assert!(ReactionRule::from_fields("", 1, false, "e", 0, 1, false, 1).is_err());
        assert!(ReactionRule::from_fields("ea", 1, false, "e", 0, 1, false, 1).is_err());
    }

    #[test]
    fn y_wildcard_only_allowed_for_partner() {
        let err = ReactionRule::from_fields("y", 1, false, "e", 0, 1, false, 1).unwrap_err();
        assert!(matches!(
            err,
            SquirmError::Rule(RuleError::WildcardNotAllowed { side: RuleSide::Us, code: 'y' })
        ));
        assert!(ReactionRule::from_fields("x", 1, true, "y", 0, 1, true, 1).is_ok());
    }

    #[test]
    fn every_negative_state_field_is_rejected() {
        let cases = [
            (-1, 0, 0, 0, "us_state"),
            (0, -1, 0, 0, "them_state"),
            (0, 0, -1, 0, "future_us_state"),
            (0, 0, 0, -1, "future_them_state"),
        ];
        for (us, them, fus, fthem, field) in cases {
            let err = ReactionRule::from_fields("e", us, false, "e", them, fus, false, fthem)
                .unwrap_err();
            assert_eq!(err, SquirmError::negative_state(field, -1));
        }
    }

    #[test]
    fn literal_partner_requires_species_and_state() {
        let rule: ReactionRule = "e8 e0 => e4-e3".parse().unwrap();
        assert!(rule.matches_us(Species::E, 8));
        assert!(!rule.matches_us(Species::A, 8));
        assert!(!rule.matches_us(Species::E, 7));
        assert!(rule.matches_them(Species::E, Species::E, 0));
        assert!(!rule.matches_them(Species::E, Species::A, 0));
    }

    #[test]
    fn same_as_us_wildcard_depends_on_us_pattern() {
        // x/x: partner must share the reacting cell's species
        let both_wild: ReactionRule = "x5 x0 => x7-x6".parse().unwrap();
        assert!(both_wild.matches_us(Species::C, 5));
        assert!(both_wild.matches_them(Species::C, Species::C, 0));
        assert!(!both_wild.matches_them(Species::C, Species::D, 0));

        // literal us with x partner: any species
        let literal_us: ReactionRule = "a12 x13 => a15-x14".parse().unwrap();
        assert!(literal_us.matches_them(Species::A, Species::D, 13));
        assert!(!literal_us.matches_them(Species::A, Species::D, 12));
    }

    #[test]
    fn any_partner_wildcard_ignores_species() {
        let rule: ReactionRule = "x4-y1 => x2-y5".parse().unwrap();
        for species in Species::ALL {
            assert!(rule.matches_us(species, 4));
            assert!(rule.matches_them(Species::E, species, 1));
        }
        assert_eq!(rule.bond_change(), BondChange::Keep);
    }

    #[test]
    fn notation_display_matches_parse_input() {
        for text in ["e8 e0 => e4-e3", "x4-y1 => x2-y5", "f4-f3 => f8 f8", "a36-a34 => a4 a4"] {
            let rule: ReactionRule = text.parse().unwrap();
            assert_eq!(rule.to_string(), text);
        }
        let breaking: ReactionRule = "x9-y9 => x8 y8".parse().unwrap();
        assert_eq!(breaking.bond_change(), BondChange::Break);
    }

    #[test]
    fn notation_rejects_malformed_text() {
        for text in [
            "e8 e0 e4-e3",
            "e8 e0 => a4-e3",
            "e8e0 => e4-e3",
            "e8 e => e4-e3",
            "q8 e0 => q4-e3",
            "y1 e0 => y2 e0",
            "e8+e0 => e4-e3",
        ] {
            assert!(text.parse::<ReactionRule>().is_err(), "{text} should not parse");
        }
    }
}
