/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Fixed 3/9/27 fractal containers and the level-by-level synthesizer.
//!
//! # Layout
//!
//! A [`FractalTensor`] holds three layers. Entry `i` of a coarser layer is the
//! synthesis parent of entries `[3i, 3i+1, 3i+2]` of the next finer layer:
//!
//! ```text
//! level 3  :  0         1         2
//! level 9  :  0 1 2     3 4 5     6 7 8
//! level 27 :  0..=8     9..=17    18..=26
//! ```
//!
//! # Synthesis order
//!
//! [`FractalTranscender::synthesize`] runs two axes at every level:
//!
//! 1. **cross** (comparison): A vs B vs C at the same index;
//! 2. **self** (composition): three children → one parent, inside each tensor.
//!
//! ```text
//! A27 B27 C27 ──cross──▶ Ms27
//!  │   │   │
//! self self self
//!  ▼   ▼   ▼
//! A9  B9  C9  ──cross──▶ Ms9
//!  │   │   │
//! self self self
//!  ▼   ▼   ▼
//! A3  B3  C3  ──cross──▶ Ms3
//! ```
//!
//! Levels 9 and 3 of the inputs are never read: every coarse value is a
//! synthesis output.

use core::fmt;

use tracing::debug;

use crate::coherence::CoherenceReport;
use crate::transcender::{MetaM, Synthesis, Transcender};
use crate::trit::TriVector;
use crate::wiring::Wiring;

/// Entries in the coarsest layer.
pub const LEVEL_3: usize = 3;
/// Entries in the middle layer.
pub const LEVEL_9: usize = 9;
/// Entries in the finest layer.
pub const LEVEL_27: usize = 27;

// ─── FractalTensor ──────────────────────────────────────────────────────────

/// Three fixed-size layers of ternary vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalTensor {
    /// Coarsest layer (3 entries).
    pub level_3: [TriVector; LEVEL_3],
    /// Middle layer (9 entries).
    pub level_9: [TriVector; LEVEL_9],
    /// Finest layer (27 entries).
    pub level_27: [TriVector; LEVEL_27],
}

impl FractalTensor {
    /// Every entry `[0,0,0]`.
    pub fn neutral() -> Self {
        Self {
            level_3: [TriVector::ZERO; LEVEL_3],
            level_9: [TriVector::ZERO; LEVEL_9],
            level_27: [TriVector::ZERO; LEVEL_27],
        }
    }

    /// Build from layers of any length, truncating or padding with `[0,0,0]`.
    pub fn from_layers(level_3: &[TriVector], level_9: &[TriVector], level_27: &[TriVector]) -> Self {
        Self {
            level_3: fit(level_3),
            level_9: fit(level_9),
            level_27: fit(level_27),
        }
    }

    /// Build from the finest layer only; coarser layers stay neutral.
    pub fn from_level_27(level_27: &[TriVector]) -> Self {
        Self::from_layers(&[], &[], level_27)
    }

    /// Finer-layer indices whose parent is `parent_idx`.
    pub const fn child_triplet_indices(parent_idx: usize) -> [usize; 3] {
        let base = 3 * parent_idx;
        [base, base + 1, base + 2]
    }

    /// Coarser-layer index of the parent of `child_idx`.
    pub const fn parent_index(child_idx: usize) -> usize {
        child_idx / 3
    }
}

impl Default for FractalTensor {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for FractalTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn head(f: &mut fmt::Formatter<'_>, layer: &[TriVector], show: usize) -> fmt::Result {
            for (i, v) in layer.iter().take(show).enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", v)?;
            }
            if layer.len() > show {
                write!(f, " + {} more", layer.len() - show)?;
            }
            Ok(())
        }
        writeln!(f, "FractalTensor(")?;
        write!(f, "  level_3:  ")?;
        head(f, &self.level_3, LEVEL_3)?;
        write!(f, "\n  level_9:  ")?;
        head(f, &self.level_9, 3)?;
        write!(f, "\n  level_27: ")?;
        head(f, &self.level_27, 3)?;
        write!(f, "\n)")
    }
}

fn fit<const N: usize>(src: &[TriVector]) -> [TriVector; N] {
    core::array::from_fn(|i| src.get(i).copied().unwrap_or(TriVector::ZERO))
}

// ─── Outputs ────────────────────────────────────────────────────────────────

/// Audit of one synthesis node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeAudit {
    /// `(M1, M2, M3, Ms)` of the node.
    pub meta: MetaM,
    /// Winning wiring.
    pub wiring: Wiring,
    /// Ambiguity score.
    pub score: u32,
    /// Reconstruction check result.
    pub reconstruction_ok: bool,
    /// Coherence report, if enforcement ran.
    pub coherence: Option<CoherenceReport>,
}

impl From<&Synthesis> for NodeAudit {
    fn from(s: &Synthesis) -> Self {
        Self {
            meta: s.meta,
            wiring: s.wiring,
            score: s.score,
            reconstruction_ok: s.reconstruction_ok,
            coherence: s.coherence,
        }
    }
}

/// Per-node audits of the three cross levels.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalAudits {
    /// 27 audits, one per level-27 index.
    pub level_27: Vec<NodeAudit>,
    /// 9 audits.
    pub level_9: Vec<NodeAudit>,
    /// 3 audits.
    pub level_3: Vec<NodeAudit>,
}

/// Cross-synthesis shapes (`Ss`) per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalShapes {
    /// Level-27 shapes.
    pub level_27: [TriVector; LEVEL_27],
    /// Level-9 shapes.
    pub level_9: [TriVector; LEVEL_9],
    /// Level-3 shapes.
    pub level_3: [TriVector; LEVEL_3],
}

/// Self-synthesized coarse layers of one input tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSynthesis {
    /// Parents of the tensor's level-27 triplets.
    pub level_9: [TriVector; LEVEL_9],
    /// Parents of `level_9` triplets.
    pub level_3: [TriVector; LEVEL_3],
}

/// Everything one fractal synthesis produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalSynthesis {
    /// Cross `Ms` at every level, as a tensor.
    pub tensor_cross: FractalTensor,
    /// Cross `Ss` at every level.
    pub shapes: FractalShapes,
    /// Per-node audits.
    pub audits: FractalAudits,
    /// Self-synthesis intermediates for A, B, C in order.
    pub locals: [LocalSynthesis; 3],
}

// ─── FractalTranscender ─────────────────────────────────────────────────────

/// Runs [`Transcender`] across and within three tensors at levels 27, 9 and 3.
#[derive(Clone, Debug, Default)]
pub struct FractalTranscender {
    transcender: Transcender,
}

impl FractalTranscender {
    /// Wrap a configured transcender.
    pub fn new(transcender: Transcender) -> Self {
        Self { transcender }
    }

    /// The node-level synthesizer.
    pub fn transcender(&self) -> &Transcender {
        &self.transcender
    }

    /// Synthesize `(a, b, c)` bottom-up. See the module docs for the order.
    pub fn synthesize(
        &self,
        a: &FractalTensor,
        b: &FractalTensor,
        c: &FractalTensor,
    ) -> FractalSynthesis {
        let (ms27, ss27, audit27) = self.cross_level(&a.level_27, &b.level_27, &c.level_27);

        let a9: [TriVector; LEVEL_9] = self.self_synthesize_up(&a.level_27);
        let b9: [TriVector; LEVEL_9] = self.self_synthesize_up(&b.level_27);
        let c9: [TriVector; LEVEL_9] = self.self_synthesize_up(&c.level_27);
        let (ms9, ss9, audit9) = self.cross_level(&a9, &b9, &c9);

        let a3: [TriVector; LEVEL_3] = self.self_synthesize_up(&a9);
        let b3: [TriVector; LEVEL_3] = self.self_synthesize_up(&b9);
        let c3: [TriVector; LEVEL_3] = self.self_synthesize_up(&c9);
        let (ms3, ss3, audit3) = self.cross_level(&a3, &b3, &c3);

        debug!(
            score_27 = audit27.iter().map(|n| n.score).sum::<u32>(),
            score_9 = audit9.iter().map(|n| n.score).sum::<u32>(),
            score_3 = audit3.iter().map(|n| n.score).sum::<u32>(),
            "fractal synthesis complete"
        );

        FractalSynthesis {
            tensor_cross: FractalTensor { level_3: ms3, level_9: ms9, level_27: ms27 },
            shapes: FractalShapes { level_27: ss27, level_9: ss9, level_3: ss3 },
            audits: FractalAudits { level_27: audit27, level_9: audit9, level_3: audit3 },
            locals: [
                LocalSynthesis { level_9: a9, level_3: a3 },
                LocalSynthesis { level_9: b9, level_3: b3 },
                LocalSynthesis { level_9: c9, level_3: c3 },
            ],
        }
    }

    /// Comparison axis: one synthesis per index across the three layers.
    fn cross_level<const N: usize>(
        &self,
        a: &[TriVector; N],
        b: &[TriVector; N],
        c: &[TriVector; N],
    ) -> ([TriVector; N], [TriVector; N], Vec<NodeAudit>) {
        let nodes: Vec<Synthesis> = (0..N)
            .map(|i| self.transcender.solve_with(a[i], b[i], c[i], true))
            .collect();
        let ms = core::array::from_fn(|i| nodes[i].ms);
        let ss = core::array::from_fn(|i| nodes[i].ss);
        let audits = nodes.iter().map(NodeAudit::from).collect();
        (ms, ss, audits)
    }

    /// Composition axis: each consecutive child triplet collapses to its `Ms`.
    fn self_synthesize_up<const P: usize>(&self, children: &[TriVector]) -> [TriVector; P] {
        debug_assert_eq!(children.len(), 3 * P);
        core::array::from_fn(|p| {
            let [i0, i1, i2] = FractalTensor::child_triplet_indices(p);
            self.transcender
                .solve_with(children[i0], children[i1], children[i2], false)
                .ms
        })
    }
}
