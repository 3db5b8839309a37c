//! Typed context keys for the three Evolver banks.
//!
//! Every key type is `Ord` so ranking ties resolve the same way on every run,
//! whatever the hash map's iteration order.

use core::fmt;

use crate::trit::TriVector;
use crate::wiring::Wiring;

/// Relator bank key: one prototype per gate role under a parent law and wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelatorKey {
    /// Parent law `Ms` the gate laws were observed under.
    pub parent: TriVector,
    /// Wiring that produced them.
    pub wiring: Wiring,
    /// Gate index, 0..=2.
    pub role: u8,
}

/// Emergence bank key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmergenceKey {
    /// The ideal parent law `learn(M1, M2, M3)`.
    Ideal,
    /// The observed `Ms` for one exact children signature.
    Signature([TriVector; 3]),
    /// The shape `infer(M1, M2, Ms)`.
    Shape,
    /// Coherence mark `[filled, conflict, kept]` for one parent law.
    CoherenceParent(TriVector),
    /// An explicitly registered archetype, keyed by its exact triplet.
    ArchetypeTriplet([TriVector; 3]),
    /// The shape of archetypes registered under a tag.
    ArchetypeShape(String),
}

/// Dynamics bank key. Tags name a level or stream, e.g. `"run:lvl9"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DynamicsKey {
    /// Per-entry transition law between consecutive rounds.
    Transition(String),
    /// Blockwise parent law of each round, three entries at a time.
    LevelSummary(String),
}

impl fmt::Display for RelatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relator({} | {} | role {})", self.parent, self.wiring, self.role)
    }
}

impl fmt::Display for EmergenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmergenceKey::Ideal => write!(f, "emergence"),
            EmergenceKey::Signature([a, b, c]) => write!(f, "emergence_sig({} {} {})", a, b, c),
            EmergenceKey::Shape => write!(f, "emergence_shape"),
            EmergenceKey::CoherenceParent(p) => write!(f, "coherence_parent({})", p),
            EmergenceKey::ArchetypeTriplet([a, b, c]) => {
                write!(f, "archetype_triplet({} {} {})", a, b, c)
            }
            EmergenceKey::ArchetypeShape(tag) => write!(f, "archetype_shape({})", tag),
        }
    }
}

impl fmt::Display for DynamicsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicsKey::Transition(tag) => write!(f, "dyn_local({})", tag),
            DynamicsKey::LevelSummary(tag) => write!(f, "dyn_level({})", tag),
        }
    }
}
