/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Triple synthesis: three vectors in, a hierarchy of laws out.
//!
//! For one wiring, each gate learns the law linking its inputs to its output:
//!
//! ```text
//! M_i = learn(X_i, Y_i, Z_i)       i = 1, 2, 3
//! Ms  = learn(M1, M2, M3)          parent law (emergent structure)
//! Ss  = infer(M1, M2, Ms)          shape (factual form)
//! ```
//!
//! Absolute coherence is then imposed top-down (see [`crate::coherence`]) and
//! `Ss` is re-derived from the reconciled children.
//!
//! Up to `max_tries` wirings are tried. The winner has the lowest ambiguity
//! score (count of unknown positions over M1, M2, M3, Ms, Ss); equal scores
//! prefer an attempt whose laws reconstruct their outputs. The walk stops at
//! the first attempt with score 0 that reconstructs.

use tracing::trace;

use crate::coherence::{enforce_absolute_coherence, CoherenceReport};
use crate::error::ConfigError;
use crate::trigate::Trigate;
use crate::trit::TriVector;
use crate::wiring::Wiring;

/// Most wirings a synthesis can explore; further rotations repeat.
pub const MAX_WIRING_TRIES: usize = 3;

// ─── MetaM ──────────────────────────────────────────────────────────────────

/// Audit trace of one synthesis: `(M1, M2, M3, Ms)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaM(pub [TriVector; 4]);

impl MetaM {
    /// First child law.
    pub fn m1(&self) -> TriVector {
        self.0[0]
    }
    /// Second child law.
    pub fn m2(&self) -> TriVector {
        self.0[1]
    }
    /// Third child law.
    pub fn m3(&self) -> TriVector {
        self.0[2]
    }
    /// Parent law.
    pub fn ms(&self) -> TriVector {
        self.0[3]
    }
    /// The three child laws.
    pub fn children(&self) -> [TriVector; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
    /// Always 4.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// Configuration for [`Transcender`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranscenderConfig {
    /// Wirings to explore, 1..=3. Default 3.
    pub max_tries: usize,
    /// Verify `infer(X, Y, M_i) == Z` (ignoring unknowns). Default `true`.
    pub check_reconstruction: bool,
    /// Impose absolute coherence on the children. Default `true`.
    pub enforce_coherence: bool,
}

impl TranscenderConfig {
    /// Check `max_tries` is within `1..=3`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tries == 0 || self.max_tries > MAX_WIRING_TRIES {
            return Err(ConfigError::MaxTriesOutOfRange { value: self.max_tries });
        }
        Ok(())
    }
}

impl Default for TranscenderConfig {
    fn default() -> Self {
        Self {
            max_tries: MAX_WIRING_TRIES,
            check_reconstruction: true,
            enforce_coherence: true,
        }
    }
}

// ─── Synthesis result ───────────────────────────────────────────────────────

/// Best-effort result of one triple synthesis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synthesis {
    /// Law of gate 0 (after coherence enforcement).
    pub m1: TriVector,
    /// Law of gate 1.
    pub m2: TriVector,
    /// Law of gate 2.
    pub m3: TriVector,
    /// Parent law.
    pub ms: TriVector,
    /// Shape `infer(M1, M2, Ms)`.
    pub ss: TriVector,
    /// `(M1, M2, M3, Ms)`.
    pub meta: MetaM,
    /// Winning wiring.
    pub wiring: Wiring,
    /// Attempt index that produced this result.
    pub attempt: usize,
    /// Unknown positions across M1, M2, M3, Ms, Ss (0–15).
    pub score: u32,
    /// Every gate law reproduced its output on known positions.
    pub reconstruction_ok: bool,
    /// Reconciliation report when coherence enforcement ran.
    pub coherence: Option<CoherenceReport>,
}

impl Synthesis {
    fn beats(&self, best: &Synthesis) -> bool {
        self.score < best.score
            || (self.score == best.score && self.reconstruction_ok && !best.reconstruction_ok)
    }
}

// ─── Transcender ────────────────────────────────────────────────────────────

/// Three-gate synthesizer over `(A, B, C)`.
#[derive(Clone, Debug, Default)]
pub struct Transcender {
    config: TranscenderConfig,
}

impl Transcender {
    /// Construct with a validated configuration.
    pub fn new(config: TranscenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &TranscenderConfig {
        &self.config
    }

    /// Synthesize laws for `(a, b, c)` using the configured reconstruction check.
    pub fn solve(&self, a: TriVector, b: TriVector, c: TriVector) -> Synthesis {
        self.solve_with(a, b, c, self.config.check_reconstruction)
    }

    /// Synthesize with an explicit reconstruction-check setting.
    pub fn solve_with(
        &self,
        a: TriVector,
        b: TriVector,
        c: TriVector,
        check_reconstruction: bool,
    ) -> Synthesis {
        let mut best = self.try_wiring(a, b, c, 0, check_reconstruction);
        if best.score == 0 && best.reconstruction_ok {
            return best;
        }
        for k in 1..self.config.max_tries {
            let res = self.try_wiring(a, b, c, k, check_reconstruction);
            let done = res.score == 0 && res.reconstruction_ok;
            if res.beats(&best) {
                best = res;
            }
            if done {
                break;
            }
        }
        best
    }

    fn try_wiring(
        &self,
        a: TriVector,
        b: TriVector,
        c: TriVector,
        attempt: usize,
        check_reconstruction: bool,
    ) -> Synthesis {
        let wiring = Wiring::for_attempt(attempt);
        let gates: [(TriVector, TriVector, TriVector); 3] = core::array::from_fn(|i| {
            let role = wiring.0[i];
            (role.in1.pick(a, b, c), role.in2.pick(a, b, c), role.out.pick(a, b, c))
        });
        let laws: [TriVector; 3] = gates.map(|(x, y, z)| Trigate::learn(x, y, z));

        let reconstruction_ok = !check_reconstruction
            || gates.iter().zip(laws.iter()).all(|(&(x, y, z), &m)| {
                Trigate::infer(x, y, m)
                    .iter()
                    .zip(z.iter())
                    .all(|(r, z)| !r.is_known() || !z.is_known() || r == z)
            });

        let ms = Trigate::learn(laws[0], laws[1], laws[2]);
        let mut ss = Trigate::infer(laws[0], laws[1], ms);
        let mut children = laws;
        let mut coherence = None;
        if self.config.enforce_coherence {
            let (reconciled, report) = enforce_absolute_coherence(laws, ms);
            ss = Trigate::infer(reconciled[0], reconciled[1], ms);
            children = reconciled;
            coherence = Some(report);
        }

        let score = children.iter().map(TriVector::unknown_count).sum::<u32>()
            + ms.unknown_count()
            + ss.unknown_count();

        trace!(attempt, %wiring, score, reconstruction_ok, "transcender attempt");

        let [m1, m2, m3] = children;
        Synthesis {
            m1,
            m2,
            m3,
            ms,
            ss,
            meta: MetaM([m1, m2, m3, ms]),
            wiring,
            attempt,
            score,
            reconstruction_ok,
            coherence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tv;

    #[test]
    fn test_solve_returns_full_result() {
        let tx = Transcender::default();
        let res = tx.solve(tv!(1, 0, 1), tv!(0, 1, 0), tv!(1, 1, 0));
        assert_eq!(res.meta.len(), 4);
        assert_eq!(res.meta.ms(), res.ms);
        assert_eq!(res.meta.children(), [res.m1, res.m2, res.m3]);
        assert_eq!(res.score, 0);
        assert!(res.reconstruction_ok);
        assert!(res.coherence.is_some());
    }

    #[test]
    fn test_known_inputs_stop_at_first_attempt() {
        let tx = Transcender::default();
        let res = tx.solve(tv!(0, 0, 1), tv!(1, 1, 1), tv!(0, 1, 0));
        assert_eq!(res.attempt, 0);
        assert_eq!(res.wiring, Wiring::for_attempt(0));
    }

    #[test]
    fn test_unknown_inputs_raise_score() {
        let tx = Transcender::default();
        let res = tx.solve(tv!(1, _, 0), tv!(0, 1, _), tv!(1, 1, 1));
        assert!(res.score > 0, "score={}", res.score);
        assert!(res.attempt < MAX_WIRING_TRIES);
    }

    #[test]
    fn test_score_counts_unknowns() {
        let tx = Transcender::default();
        let res = tx.solve(TriVector::UNKNOWN, TriVector::UNKNOWN, TriVector::UNKNOWN);
        assert_eq!(res.score, 15);
        assert!(res.reconstruction_ok);
    }

    #[test]
    fn test_ms_matches_learned_children_when_known() {
        let tx = Transcender::default();
        let res = tx.solve(tv!(1, 1, 0), tv!(0, 1, 1), tv!(1, 0, 0));
        assert_eq!(res.ms, Trigate::learn(res.m1, res.m2, res.m3));
        assert_eq!(res.ss, Trigate::infer(res.m1, res.m2, res.ms));
        assert_eq!(res.ss, res.m3);
    }

    #[test]
    fn test_coherence_can_be_disabled() {
        let config = TranscenderConfig { enforce_coherence: false, ..Default::default() };
        let tx = Transcender::new(config).unwrap();
        let res = tx.solve(tv!(1, 0, 1), tv!(0, 1, 0), tv!(1, 1, 0));
        assert!(res.coherence.is_none());
    }

    #[test]
    fn test_config_rejects_bad_max_tries() {
        let config = TranscenderConfig { max_tries: 0, ..Default::default() };
        assert_eq!(
            Transcender::new(config).unwrap_err(),
            ConfigError::MaxTriesOutOfRange { value: 0 }
        );
        let config = TranscenderConfig { max_tries: 4, ..Default::default() };
        assert!(Transcender::new(config).is_err());
    }
}
