/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Absolute coherence: a parent law must reproduce each of its three children.
//!
//! Each child is deduced from the other two and the parent law:
//!
//! ```text
//! M1^ = infer(M2, M3, Ms)
//! M2^ = infer(M3, M1, Ms)
//! M3^ = infer(M1, M2, Ms)
//! ```
//!
//! and reconciled bit by bit against the observed child:
//!
//! | observed | deduced | result   | counter             |
//! |----------|---------|----------|---------------------|
//! | unknown  | known   | deduced  | `null_filled`       |
//! | known    | unknown | observed | `kept_observed`     |
//! | known    | known ≠ | deduced  | `conflict_resolved` |
//! | equal / both unknown | | observed | –           |
//!
//! Deductions always read the children as they were before reconciliation.

use core::ops::{Add, AddAssign};

use crate::trigate::Trigate;
use crate::trit::{TriVector, Trit};

/// Reconciliation counters for one child or an aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcileStats {
    /// Unknown observed bits filled from the deduction.
    pub null_filled: u32,
    /// Known observed bits overridden by a differing known deduction.
    pub conflict_resolved: u32,
    /// Known observed bits kept because the deduction was unknown.
    pub kept_observed: u32,
}

impl ReconcileStats {
    /// `true` when within both limits.
    pub fn within(&self, max_conflicts: u32, max_null_fills: u32) -> bool {
        self.conflict_resolved <= max_conflicts && self.null_filled <= max_null_fills
    }

    /// `true` when nothing was filled or overridden.
    pub fn is_clean(&self) -> bool {
        self.null_filled == 0 && self.conflict_resolved == 0
    }
}

impl Add for ReconcileStats {
    type Output = ReconcileStats;

    fn add(self, rhs: ReconcileStats) -> ReconcileStats {
        ReconcileStats {
            null_filled: self.null_filled + rhs.null_filled,
            conflict_resolved: self.conflict_resolved + rhs.conflict_resolved,
            kept_observed: self.kept_observed + rhs.kept_observed,
        }
    }
}

impl AddAssign for ReconcileStats {
    fn add_assign(&mut self, rhs: ReconcileStats) {
        *self = *self + rhs;
    }
}

/// Per-child and total counters from one enforcement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoherenceReport {
    /// Counters for M1, M2, M3 in order.
    pub children: [ReconcileStats; 3],
    /// Sum over the three children.
    pub totals: ReconcileStats,
    /// The parent law the children were reconciled against.
    pub parent: TriVector,
}

/// Reconcile one observed bit against its deduction, preferring the deduction.
pub fn reconcile_trit(observed: Trit, deduced: Trit) -> (Trit, ReconcileStats) {
    let mut stats = ReconcileStats::default();
    let value = match (observed.is_known(), deduced.is_known()) {
        (false, true) => {
            stats.null_filled = 1;
            deduced
        }
        (true, false) => {
            stats.kept_observed = 1;
            observed
        }
        (true, true) if observed != deduced => {
            stats.conflict_resolved = 1;
            deduced
        }
        _ => observed,
    };
    (value, stats)
}

/// Reconcile a whole child vector against its deduction.
pub fn reconcile(observed: TriVector, deduced: TriVector) -> (TriVector, ReconcileStats) {
    let mut out = observed;
    let mut stats = ReconcileStats::default();
    for i in 0..3 {
        let (v, s) = reconcile_trit(observed.0[i], deduced.0[i]);
        out.0[i] = v;
        stats += s;
    }
    (out, stats)
}

/// Deduce each child from the other two and `parent`, in `[M1^, M2^, M3^]` order.
pub fn deduce_children(children: [TriVector; 3], parent: TriVector) -> [TriVector; 3] {
    let [m1, m2, m3] = children;
    [
        Trigate::infer(m2, m3, parent),
        Trigate::infer(m3, m1, parent),
        Trigate::infer(m1, m2, parent),
    ]
}

/// Impose `parent` on its three children. Returns the reconciled children and the report.
pub fn enforce_absolute_coherence(
    children: [TriVector; 3],
    parent: TriVector,
) -> ([TriVector; 3], CoherenceReport) {
    let deduced = deduce_children(children, parent);
    let mut report = CoherenceReport { parent, ..CoherenceReport::default() };
    let mut out = children;
    for i in 0..3 {
        let (v, s) = reconcile(children[i], deduced[i]);
        out[i] = v;
        report.children[i] = s;
        report.totals += s;
    }
    (out, report)
}

/// `true` when every child equals its deduction from the other two and `parent`.
pub fn is_coherent(children: [TriVector; 3], parent: TriVector) -> bool {
    deduce_children(children, parent) == children
}
