//! Built-in reaction sets.
//!
//! These are the chemistries that shipped with the Squirm3 applet. The
//! default, [`Preset::Replicator`], makes the seed polymer
//! `e8-a1-b1-c1-f1` copy itself out of free monomers.

use crate::error::{ConfigError, Result, SquirmError};
use crate::reaction::ReactionRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw rule fields in registration order:
/// `(us, us_state, bonded, them, them_state, future_us, bond_after, future_them)`.
type RawRule = (&'static str, i64, bool, &'static str, i64, i64, bool, i64);

const REPLICATOR: &[RawRule] = &[
    ("e", 8, false, "e", 0, 4, true, 3),
    ("x", 4, true, "y", 1, 2, true, 5),
    ("x", 5, false, "x", 0, 7, true, 6),
    ("x", 3, false, "y", 6, 2, true, 3),
    ("x", 7, true, "y", 3, 4, true, 3),
    ("f", 4, true, "f", 3, 8, false, 8),
    ("x", 2, true, "y", 8, 9, true, 1),
    ("x", 9, true, "y", 9, 8, false, 8),
];

const GENE_INSTRUCTIONS: &[RawRule] = &[
    ("e", 1, false, "e", 0, 4, true, 3),
    ("x", 4, true, "y", 1, 2, true, 5),
    ("x", 5, false, "x", 0, 7, true, 6),
    ("x", 3, false, "y", 6, 2, true, 3),
    ("x", 7, true, "y", 3, 4, true, 3),
    ("f", 4, true, "f", 3, 8, false, 8),
    ("x", 2, true, "y", 8, 9, true, 10),
    ("x", 9, true, "y", 9, 8, false, 8),
    ("f", 10, true, "x", 10, 1, true, 11),
    ("x", 12, true, "y", 10, 1, true, 11),
    ("e", 8, true, "x", 12, 1, true, 1),
    // catalysts
    ("a", 11, false, "b", 0, 12, false, 1),
    ("b", 11, false, "a", 0, 12, false, 0),
    ("c", 11, false, "d", 0, 12, false, 0),
    ("d", 11, false, "d", 0, 12, false, 0),
];

const REPLICATOR_V5: &[RawRule] = &[
    ("e", 1, false, "e", 0, 4, true, 10),
    ("x", 4, true, "y", 1, 2, true, 5),
    ("x", 5, false, "x", 0, 7, true, 6),
    ("x", 10, false, "y", 6, 3, true, 10),
    ("x", 7, true, "y", 10, 4, true, 10),
    ("f", 4, true, "f", 10, 8, false, 8),
    ("x", 2, true, "y", 8, 9, true, 1),
    ("x", 3, true, "y", 8, 9, true, 1),
    ("x", 9, true, "y", 9, 8, false, 8),
    ("e", 8, true, "x", 1, 1, true, 1),
];

const MEMBRANE: &[RawRule] = &[
    // pre-duplication hurdles
    ("e", 1, false, "d", 0, 37, false, 0),
    ("e", 37, false, "c", 0, 38, false, 0),
    // start of duplication
    ("e", 38, false, "a", 11, 5, true, 10),
    ("a", 10, true, "a", 4, 10, true, 11),
    ("a", 11, false, "e", 6, 13, true, 3),
    // mid-duplication
    ("x", 4, true, "y", 1, 2, true, 5),
    ("x", 5, false, "x", 0, 7, true, 6),
    ("x", 3, false, "y", 6, 2, true, 3),
    ("x", 7, true, "x", 3, 4, true, 3),
    // start of splitting
    ("f", 4, false, "a", 4, 8, true, 10),
    ("f", 3, false, "a", 11, 8, false, 12),
    // mid-splitting
    ("x", 8, true, "y", 8, 9, false, 9),
    ("x", 9, true, "y", 2, 1, true, 8),
    // start of pulling
    ("a", 10, true, "f", 1, 19, true, 12),
    ("a", 12, false, "f", 11, 20, true, 21),
    ("a", 19, true, "f", 21, 19, true, 11),
    ("a", 20, false, "x", 13, 15, true, 14),
    // mid-pulling
    ("x", 12, true, "y", 1, 11, true, 13),
    ("a", 9, false, "x", 13, 15, true, 14),
    ("a", 15, true, "x", 11, 16, false, 17),
    ("a", 16, true, "x", 14, 9, true, 12),
    ("x", 17, true, "y", 11, 1, true, 11),
    // end of pulling
    ("x", 12, true, "e", 9, 11, true, 13),
    // membranes join
    ("a", 15, true, "e", 12, 22, false, 13),
    ("a", 22, true, "a", 19, 22, true, 25),
    ("a", 25, true, "f", 1, 26, false, 1),
    ("a", 26, false, "a", 10, 24, true, 23),
    // membranes separate
    ("a", 22, true, "a", 24, 11, false, 4),
    ("a", 14, true, "a", 23, 27, false, 28),
    // gene strings released into their new membranes
    ("a", 27, true, "e", 9, 4, false, 1),
    ("a", 28, true, "e", 13, 30, false, 29),
    ("e", 29, true, "x", 17, 1, true, 1),
    ("a", 30, true, "a", 11, 4, true, 4),
    // a31 synthesis on contact of a0 with x1 or x2
    ("x", 1, false, "a", 0, 1, false, 31),
    ("x", 2, false, "a", 0, 2, false, 31),
    // membrane growth
    ("a", 4, false, "a", 31, 33, true, 32),
    ("a", 33, true, "a", 4, 34, true, 35),
    ("a", 35, false, "a", 32, 36, true, 4),
    ("a", 36, true, "a", 34, 4, false, 4),
];

/// A named built-in chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Slimline replication of `e8-a1-b1-…-f1` strings.
    #[default]
    Replicator,
    /// Genes as instructions, with a few catalysing reactions.
    GeneInstructions,
    /// Variant 5 replication.
    ReplicatorV5,
    /// Variant 9: replication plus membrane growth and division.
    Membrane,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Replicator,
        Preset::GeneInstructions,
        Preset::ReplicatorV5,
        Preset::Membrane,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Replicator => "replicator",
            Preset::GeneInstructions => "gene-instructions",
            Preset::ReplicatorV5 => "replicator-v5",
            Preset::Membrane => "membrane",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Replicator => "slimline replication reactions for e8-a1-b1-...-f1",
            Preset::GeneInstructions => "genes as instructions for e1-a1-b1-...-f1, with catalysts",
            Preset::ReplicatorV5 => "variant 5 self-replicating strings",
            Preset::Membrane => "variant 9 replication with membrane growth and division",
        }
    }

    fn table(self) -> &'static [RawRule] {
        match self {
            Preset::Replicator => REPLICATOR,
            Preset::GeneInstructions => GENE_INSTRUCTIONS,
            Preset::ReplicatorV5 => REPLICATOR_V5,
            Preset::Membrane => MEMBRANE,
        }
    }

    /// The validated rules of this preset, in evaluation order.
    pub fn rules(self) -> Result<Vec<ReactionRule>> {
        self.table()
            .iter()
            .map(|&(us, us_state, bonded, them, them_state, future_us, bond_after, future_them)| {
                ReactionRule::from_fields(
                    us,
                    us_state,
                    bonded,
                    them,
                    them_state,
                    future_us,
                    bond_after,
                    future_them,
                )
            })
            .collect()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SquirmError;

    fn from_str(name: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()).into())
    }
}
