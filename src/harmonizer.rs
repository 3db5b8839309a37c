/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Escalating repair of a parent-law triplet and its observed children.
//!
//! # State machine
//!
//! ```text
//! SOFT ──▶ CONTEXTUAL ──▶ LOCAL ──▶ STRUCTURAL ──▶ ARCHETYPAL
//!              │            │           │              │
//!              └── accept ──┴── accept ─┴── accept ────┴──▶ HarmonyResult
//! ```
//!
//! | state      | action                                            | accepts when                          |
//! |------------|---------------------------------------------------|---------------------------------------|
//! | SOFT       | best cyclic rotation of each component's children | never (always continues)              |
//! | CONTEXTUAL | [`Extender::extend_triplet`] on the rotated seeds | every component within both limits    |
//! | LOCAL      | blend each child with its deduction               | similarity gain `>= min_child_sim`    |
//! | STRUCTURAL | alternate relator lookup, re-extend LOCAL output  | every component within both limits    |
//! | ARCHETYPAL | register the parent triplet as an archetype       | always                                |
//!
//! # Invariants
//!
//! - Each visited state appends exactly one [`AuditRecord`]; at most five.
//! - `repaired` is always `true`. `escalated` is `true` only for ARCHETYPAL,
//!   so callers can apply their own rejection policy.

use core::fmt;

use heapless::Vec as HVec;
use tracing::{debug, info};

use crate::coherence::{deduce_children, ReconcileStats};
use crate::error::ConfigError;
use crate::evolver::{Archetype, PatternBank, RelatorCandidate};
use crate::extender::{Extender, TripletExtension};
use crate::trit::TriVector;
use crate::wiring::Wiring;

/// Upper bound on audit records per run.
pub const MAX_STEPS: usize = 5;

/// Tag under which escalated triplets are registered.
pub const ARCHETYPE_TAG: &str = "harmonizer";

/// Largest meaningful `min_child_sim`: nine children, three positions each.
pub const MAX_CHILD_SIM: u32 = 27;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Acceptance thresholds for [`Harmonizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarmonizerConfig {
    /// Conflicts tolerated per component. Default 0.
    pub max_conflicts: u32,
    /// Null fills tolerated per component. Default 3.
    pub max_null_fills: u32,
    /// LOCAL acceptance threshold on the summed child similarity. Default 6.
    pub min_child_sim: u32,
}

impl HarmonizerConfig {
    /// Check `min_child_sim` is attainable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_child_sim > MAX_CHILD_SIM {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "min_child_sim",
                value: self.min_child_sim,
                max: MAX_CHILD_SIM,
            });
        }
        Ok(())
    }
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self { max_conflicts: 0, max_null_fills: 3, min_child_sim: 6 }
    }
}

// ─── Audit ──────────────────────────────────────────────────────────────────

/// States of the repair machine, in escalation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HarmonyStep {
    /// Rotation of observed children.
    Soft,
    /// Top-down extension with context.
    Contextual,
    /// Bitwise blend against deductions.
    Local,
    /// Alternate relator and re-extension.
    Structural,
    /// Unconditional acceptance plus archetype registration.
    Archetypal,
}

impl fmt::Display for HarmonyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HarmonyStep::Soft => "soft",
            HarmonyStep::Contextual => "contextual",
            HarmonyStep::Local => "local",
            HarmonyStep::Structural => "structural",
            HarmonyStep::Archetypal => "archetypal",
        };
        f.write_str(s)
    }
}

/// One audit entry per visited state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditRecord {
    /// SOFT outcome.
    Soft {
        /// Chosen rotation per component.
        rotations: [usize; 3],
        /// Known positions across the rotated seeds.
        defined_bits: u32,
        /// A contextual shape drove the choice.
        context_present: bool,
    },
    /// CONTEXTUAL outcome.
    Contextual {
        /// Reconciliation totals per component.
        coherence: [ReconcileStats; 3],
        /// Relator wiring hints per component.
        wiring_hints: [Option<Wiring>; 3],
        /// Terminal.
        accepted: bool,
    },
    /// LOCAL outcome.
    Local {
        /// Summed similarity between each child before and after the blend.
        similarity_gain: u32,
        /// Blend counters per component; `conflict_resolved` counts kept disagreements.
        stats: [ReconcileStats; 3],
        /// Terminal.
        accepted: bool,
    },
    /// STRUCTURAL outcome.
    Structural {
        /// Second-best relator per component, if any.
        alt_hints: [Option<RelatorCandidate>; 3],
        /// Reconciliation totals of the re-extension.
        coherence: [ReconcileStats; 3],
        /// Terminal.
        accepted: bool,
    },
    /// ARCHETYPAL outcome.
    Archetypal {
        /// The archetype the bank registered, if it stores archetypes.
        archetype: Option<Archetype>,
    },
}

impl AuditRecord {
    /// State this record belongs to.
    pub fn step(&self) -> HarmonyStep {
        match self {
            AuditRecord::Soft { .. } => HarmonyStep::Soft,
            AuditRecord::Contextual { .. } => HarmonyStep::Contextual,
            AuditRecord::Local { .. } => HarmonyStep::Local,
            AuditRecord::Structural { .. } => HarmonyStep::Structural,
            AuditRecord::Archetypal { .. } => HarmonyStep::Archetypal,
        }
    }

    /// `true` if this state ended the run.
    pub fn accepted(&self) -> bool {
        match self {
            AuditRecord::Soft { .. } => false,
            AuditRecord::Contextual { accepted, .. }
            | AuditRecord::Local { accepted, .. }
            | AuditRecord::Structural { accepted, .. } => *accepted,
            AuditRecord::Archetypal { .. } => true,
        }
    }
}

// ─── Result ─────────────────────────────────────────────────────────────────

/// Parent triplet and the children of each component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarmonyState {
    /// `(Msx, Msy, Msz)`.
    pub parent: [TriVector; 3],
    /// `[M1, M2, M3]` per component.
    pub children: [[TriVector; 3]; 3],
}

/// Outcome of [`Harmonizer::harmonize_from_state`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarmonyResult {
    /// Accepted state.
    pub state: HarmonyState,
    /// One record per visited state, in order.
    pub audit: HVec<AuditRecord, MAX_STEPS>,
    /// Always `true`.
    pub repaired: bool,
    /// Acceptance came from the ARCHETYPAL fallback.
    pub escalated: bool,
}

impl HarmonyResult {
    /// The state that accepted.
    pub fn accepted_at(&self) -> Option<HarmonyStep> {
        self.audit.last().filter(|r| r.accepted()).map(AuditRecord::step)
    }
}

// ─── Harmonizer ─────────────────────────────────────────────────────────────

/// Escalating repair controller.
#[derive(Clone, Debug, Default)]
pub struct Harmonizer {
    config: HarmonizerConfig,
}

impl Harmonizer {
    /// Construct with validated thresholds.
    pub fn new(config: HarmonizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active thresholds.
    pub fn config(&self) -> &HarmonizerConfig {
        &self.config
    }

    /// Repair `observed` children against `parent`, escalating until a state accepts.
    ///
    /// `context` holds one shape vector per component and steers SOFT rotation.
    pub fn harmonize_from_state<B: PatternBank + ?Sized>(
        &self,
        bank: &mut B,
        parent: [TriVector; 3],
        observed: [[TriVector; 3]; 3],
        context: Option<[TriVector; 3]>,
    ) -> HarmonyResult {
        let mut audit: HVec<AuditRecord, MAX_STEPS> = HVec::new();
        let finish = |children: [[TriVector; 3]; 3],
                      audit: HVec<AuditRecord, MAX_STEPS>,
                      escalated: bool| HarmonyResult {
            state: HarmonyState { parent, children },
            audit,
            repaired: true,
            escalated,
        };

        // SOFT
        let mut rotations = [0usize; 3];
        let seeds: [[TriVector; 3]; 3] = core::array::from_fn(|d| {
            let (s, rotated) = best_rotation(observed[d], context.map(|c| c[d]));
            rotations[d] = s;
            rotated
        });
        let defined_bits = seeds.iter().flatten().map(TriVector::known_count).sum();
        let _ = audit.push(AuditRecord::Soft {
            rotations,
            defined_bits,
            context_present: context.is_some(),
        });
        debug!(step = %HarmonyStep::Soft, ?rotations, defined_bits, "harmonizer step");

        // CONTEXTUAL
        let ext = Extender::new(&*bank).extend_triplet(parent, Some(seeds));
        let accepted = self.coherence_ok(&ext);
        let _ = audit.push(AuditRecord::Contextual {
            coherence: totals(&ext),
            wiring_hints: ext.wiring_hints(),
            accepted,
        });
        debug!(step = %HarmonyStep::Contextual, accepted, "harmonizer step");
        if accepted {
            return finish(ext.children(), audit, false);
        }

        // LOCAL
        let before = ext.children();
        let mut stats = [ReconcileStats::default(); 3];
        let adjusted: [[TriVector; 3]; 3] = core::array::from_fn(|d| {
            let (children, s) = local_blend(before[d], parent[d]);
            stats[d] = s;
            children
        });
        let similarity_gain = before
            .iter()
            .flatten()
            .zip(adjusted.iter().flatten())
            .map(|(b, a)| b.similarity(a))
            .sum::<u32>();
        let accepted = similarity_gain >= self.config.min_child_sim;
        let _ = audit.push(AuditRecord::Local { similarity_gain, stats, accepted });
        debug!(step = %HarmonyStep::Local, similarity_gain, accepted, "harmonizer step");
        if accepted {
            return finish(adjusted, audit, false);
        }

        // STRUCTURAL
        let alt_hints = parent.map(|ms| bank.select_relator_k(ms, 2).get(1).copied());
        let ext = Extender::new(&*bank).extend_triplet(parent, Some(adjusted));
        let accepted = self.coherence_ok(&ext);
        let _ = audit.push(AuditRecord::Structural {
            alt_hints,
            coherence: totals(&ext),
            accepted,
        });
        debug!(step = %HarmonyStep::Structural, accepted, "harmonizer step");
        if accepted {
            return finish(ext.children(), audit, false);
        }

        // ARCHETYPAL
        let archetype = bank.create_new_archetype_triplet(parent, ARCHETYPE_TAG);
        info!(
            archetype_created = archetype.is_some(),
            "harmonizer escalated to archetypal acceptance"
        );
        let _ = audit.push(AuditRecord::Archetypal { archetype });
        finish(adjusted, audit, true)
    }

    fn coherence_ok(&self, ext: &TripletExtension) -> bool {
        ext.coherence_ok(self.config.max_conflicts, self.config.max_null_fills)
    }
}

fn totals(ext: &TripletExtension) -> [ReconcileStats; 3] {
    ext.components.map(|c| c.report.totals)
}

/// Rotation (0..3) of all three children that maximizes known bits, or the
/// similarity to `shape` when one is given. The first maximum wins.
fn best_rotation(children: [TriVector; 3], shape: Option<TriVector>) -> (usize, [TriVector; 3]) {
    let score = |trio: &[TriVector; 3]| -> u32 {
        match shape {
            Some(ss) => trio.iter().map(|v| v.similarity(&ss)).sum(),
            None => trio.iter().map(TriVector::known_count).sum(),
        }
    };
    let mut best = (0, children);
    let mut best_score = score(&children);
    for s in 1..3 {
        let rotated = children.map(|v| v.rotate(s));
        let sc = score(&rotated);
        if sc > best_score {
            best = (s, rotated);
            best_score = sc;
        }
    }
    best
}

/// Blend each child with its deduction from the siblings and `parent`:
/// unknown takes the deduction, known is kept. Disagreements are counted.
fn local_blend(children: [TriVector; 3], parent: TriVector) -> ([TriVector; 3], ReconcileStats) {
    let deduced = deduce_children(children, parent);
    let mut stats = ReconcileStats::default();
    let mut out = children;
    for (child, ded) in out.iter_mut().zip(deduced) {
        for i in 0..3 {
            let (o, d) = (child.0[i], ded.0[i]);
            match (o.is_known(), d.is_known()) {
                (false, true) => {
                    child.0[i] = d;
                    stats.null_filled += 1;
                }
                (true, false) => stats.kept_observed += 1,
                (true, true) if o != d => stats.conflict_resolved += 1,
                _ => {}
            }
        }
    }
    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolver::EmptyBank;
    use crate::trigate::Trigate;
    use crate::tv;

    fn coherent(children: [TriVector; 3]) -> TriVector {
        Trigate::learn(children[0], children[1], children[2])
    }

    #[test]
    fn test_best_rotation_prefers_known_bits_then_first() {
        let children = [tv!(_, 1, 0), tv!(_, 0, 0), tv!(_, 1, 1)];
        let (s, _) = best_rotation(children, None);
        assert_eq!(s, 0);
        let (s, rotated) = best_rotation(children, Some(tv!(1, 1, _)));
        // rotate(2) of [·,1,0] is [1,0,·]; rotate(1) is [0,·,1].
        assert_eq!(s, 2);
        assert_eq!(rotated[0], tv!(1, 0, _));
    }

    #[test]
    fn test_local_blend_keeps_observed_and_counts_conflicts() {
        let m1 = tv!(1, 0, 1);
        let m2 = tv!(0, 1, 1);
        let parent = tv!(1, 1, 1);
        let truth = Trigate::infer(m1, m2, parent);
        let (out, stats) = local_blend([m1, m2, tv!(_, _, _)], parent);
        assert_eq!(out[2], truth);
        assert_eq!(stats.null_filled, 3);

        let wrong = tv!(0, 0, 0);
        let (out, stats) = local_blend([m1, m2, wrong], parent);
        assert_eq!(out[2], wrong);
        assert!(stats.conflict_resolved > 0);
    }

    #[test]
    fn test_consistent_children_accept_at_contextual() {
        let x = [tv!(1, 0, 1), tv!(0, 1, 1), tv!(1, 1, 0)];
        let y = [tv!(0, 0, 0), tv!(1, 1, 1), tv!(0, 1, 0)];
        let z = [tv!(1, 1, 1), tv!(1, 0, 0), tv!(0, 0, 1)];
        let parent = [coherent(x), coherent(y), coherent(z)];
        let res = Harmonizer::default().harmonize_from_state(&mut EmptyBank, parent, [x, y, z], None);
        assert!(res.repaired);
        assert!(!res.escalated);
        assert!(res.audit.len() <= 2);
        assert_eq!(res.accepted_at(), Some(HarmonyStep::Contextual));
        assert_eq!(res.state.children, [x, y, z]);
    }

    #[test]
    fn test_conflicting_children_escalate_past_contextual() {
        let x = [tv!(1, _, _), tv!(0, _, _), tv!(0, _, _)];
        // Position 0 is consistent with parent 0, so parent 1 conflicts.
        let parent = [tv!(1, 1, 1), TriVector::UNKNOWN, TriVector::UNKNOWN];
        let observed = [x, [TriVector::UNKNOWN; 3], [TriVector::UNKNOWN; 3]];
        let res = Harmonizer::default().harmonize_from_state(&mut EmptyBank, parent, observed, None);
        assert!(res.repaired);
        assert!(res.audit.len() <= MAX_STEPS);
        assert_eq!(res.audit[0].step(), HarmonyStep::Soft);
        assert!(!res.audit[1].accepted());
        // Only three known bits remain, below the LOCAL threshold of six.
        assert!(matches!(
            res.audit[2],
            AuditRecord::Local { similarity_gain: 3, accepted: false, .. }
        ));
        assert_eq!(res.accepted_at(), Some(HarmonyStep::Structural));
        assert!(!res.escalated);
    }

    #[test]
    fn test_config_validation() {
        assert!(Harmonizer::new(HarmonizerConfig::default()).is_ok());
        let bad = HarmonizerConfig { min_child_sim: 28, ..Default::default() };
        assert!(Harmonizer::new(bad).is_err());
    }
}
