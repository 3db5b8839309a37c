/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Top-down reconstruction: children laws from a parent law.
//!
//! The inverse of [`crate::transcender`]. Given a parent law `Ms` and optional
//! seed children, [`Extender::extend_component`]:
//!
//! 1. replaces every fully-unknown seed with the strongest dynamics prior of
//!    the attached [`PatternBank`] (or leaves it unknown when there is none);
//! 2. imposes absolute coherence with the same procedure and counters the
//!    Transcender uses ([`enforce_absolute_coherence`]);
//! 3. asks the bank for a wiring hint for the audit trail.
//!
//! Missing knowledge never fails; it surfaces as unknown positions.

use core::fmt;

use tracing::trace;

use crate::coherence::{enforce_absolute_coherence, CoherenceReport};
use crate::evolver::PatternBank;
use crate::trigate::{Trigate, TrigateRecord};
use crate::trit::TriVector;
use crate::wiring::Wiring;

/// One of the three parallel components of a triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Component {
    /// First component.
    X,
    /// Second component.
    Y,
    /// Third component.
    Z,
}

impl Component {
    /// All components in order.
    pub const ALL: [Component; 3] = [Component::X, Component::Y, Component::Z];

    /// Position in a triplet.
    pub const fn index(self) -> usize {
        match self {
            Component::X => 0,
            Component::Y => 1,
            Component::Z => 2,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Component::X => "x",
            Component::Y => "y",
            Component::Z => "z",
        };
        f.write_str(s)
    }
}

// ─── Results ────────────────────────────────────────────────────────────────

/// Reconstructed children of one parent law.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentExtension {
    /// Parent law the children were reconciled against.
    pub parent: TriVector,
    /// Reconciled children `[M1, M2, M3]`.
    pub children: [TriVector; 3],
    /// Wiring suggested by the bank, informational only.
    pub wiring_hint: Option<Wiring>,
    /// Reconciliation counters.
    pub report: CoherenceReport,
    /// Which children were seeded from the dynamics prior.
    pub prior_used: [bool; 3],
}

/// Reconstructed children of a parent-law triplet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripletExtension {
    /// Parent laws `(Msx, Msy, Msz)`.
    pub parent: [TriVector; 3],
    /// Per-component results in `X, Y, Z` order.
    pub components: [ComponentExtension; 3],
}

impl TripletExtension {
    /// Result for one component.
    pub fn component(&self, c: Component) -> &ComponentExtension {
        &self.components[c.index()]
    }

    /// Children of every component.
    pub fn children(&self) -> [[TriVector; 3]; 3] {
        self.components.map(|c| c.children)
    }

    /// Wiring hints of every component.
    pub fn wiring_hints(&self) -> [Option<Wiring>; 3] {
        self.components.map(|c| c.wiring_hint)
    }

    /// `true` when every component stays within both reconciliation limits.
    pub fn coherence_ok(&self, max_conflicts: u32, max_null_fills: u32) -> bool {
        self.components
            .iter()
            .all(|c| c.report.totals.within(max_conflicts, max_null_fills))
    }
}

/// Two of the three observable vectors of one gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnownPair {
    /// Both inputs; the output is missing.
    Inputs {
        /// First input.
        a: TriVector,
        /// Second input.
        b: TriVector,
    },
    /// First input and output; the second input is missing.
    FirstAndOutput {
        /// First input.
        a: TriVector,
        /// Output.
        r: TriVector,
    },
    /// Second input and output; the first input is missing.
    SecondAndOutput {
        /// Second input.
        b: TriVector,
        /// Output.
        r: TriVector,
    },
}

/// Recover the missing vector of a gate from its law and the two known ones.
pub fn reconstruct_vectors(law: TriVector, known: KnownPair) -> TrigateRecord {
    match known {
        KnownPair::Inputs { a, b } => Trigate::from_inputs(a, b, law),
        KnownPair::FirstAndOutput { a, r } => TrigateRecord {
            a,
            b: Trigate::deduce_b(a, law, r),
            m: law,
            r,
        },
        KnownPair::SecondAndOutput { b, r } => TrigateRecord {
            a: Trigate::deduce_a(b, law, r),
            b,
            m: law,
            r,
        },
    }
}

// ─── Extender ───────────────────────────────────────────────────────────────

/// Top-down reconstructor backed by a pattern bank.
#[derive(Clone, Copy, Debug)]
pub struct Extender<'a, B: PatternBank + ?Sized> {
    bank: &'a B,
}

impl<'a, B: PatternBank + ?Sized> Extender<'a, B> {
    /// Reconstruct against `bank`'s priors and relators.
    pub fn new(bank: &'a B) -> Self {
        Self { bank }
    }

    /// Strongest dynamics prototype, or all-unknown.
    fn prior(&self) -> TriVector {
        self.bank
            .dynamics_top(1)
            .first()
            .map_or(TriVector::UNKNOWN, |(_, p)| p.proto)
    }

    /// Reconstruct the three children of `parent`. `None` seeds count as fully unknown.
    pub fn extend_component(
        &self,
        parent: TriVector,
        seeds: Option<[TriVector; 3]>,
    ) -> ComponentExtension {
        let mut children = seeds.unwrap_or([TriVector::UNKNOWN; 3]);
        let prior_used = children.map(|c| c.is_fully_unknown());
        if prior_used.iter().any(|&p| p) {
            let prior = self.prior();
            for (child, &use_prior) in children.iter_mut().zip(&prior_used) {
                if use_prior {
                    *child = prior;
                }
            }
        }

        let (children, report) = enforce_absolute_coherence(children, parent);
        let wiring_hint = self.bank.select_relator(parent);
        trace!(
            parent = %parent,
            filled = report.totals.null_filled,
            conflicts = report.totals.conflict_resolved,
            "extended component"
        );
        ComponentExtension { parent, children, wiring_hint, report, prior_used }
    }

    /// [`Extender::extend_component`] for each of `X`, `Y`, `Z`.
    pub fn extend_triplet(
        &self,
        parent: [TriVector; 3],
        seeds: Option<[[TriVector; 3]; 3]>,
    ) -> TripletExtension {
        let components = Component::ALL.map(|c| {
            let i = c.index();
            self.extend_component(parent[i], seeds.map(|s| s[i]))
        });
        TripletExtension { parent, components }
    }
}
