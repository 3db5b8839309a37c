/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Trigate: the position-wise ternary truth-table unit.
//!
//! Four operations, each backed by one precomputed 27-entry table:
//!
//! ```text
//! infer(A, B, M)    -> R    r = xor(a,b) if m else not xor(a,b)
//! learn(A, B, R)    -> M    m = (r == xor(a,b))
//! deduce_a(B, M, R) -> A    a = xor(b,r) if m else not xor(b,r)
//! deduce_b(A, M, R) -> B    b = xor(a,r) if m else not xor(a,r)
//! ```
//!
//! # Invariants
//!
//! - Totality: every table is defined on all of `{0,1,·}³`.
//! - Any `Unknown` operand yields `Unknown`.
//! - Duality: for known `a, b, r`, `infer(a, b, learn(a, b, r)) == r`.

use crate::trit::{TriVector, Trit, TRIT_VALUES};

// ─── Lookup tables ──────────────────────────────────────────────────────────

#[inline]
const fn lut_index(x: Trit, y: Trit, z: Trit) -> usize {
    x.index() * 9 + y.index() * 3 + z.index()
}

/// `r` from `(a, b, m)`; also the shape of both deductions with operands permuted.
const fn infer_trit(a: Trit, b: Trit, m: Trit) -> Trit {
    match m {
        Trit::True => a.xor(b),
        Trit::False => a.xnor(b),
        Trit::Unknown => Trit::Unknown,
    }
}

const fn learn_trit(a: Trit, b: Trit, r: Trit) -> Trit {
    let x = a.xor(b);
    match (x.to_bool(), r.to_bool()) {
        (Some(x), Some(r)) => Trit::from_bool(x == r),
        _ => Trit::Unknown,
    }
}

const fn build_table(op: u8) -> [Trit; 27] {
    let mut table = [Trit::Unknown; 27];
    let mut i = 0;
    while i < 3 {
        let mut j = 0;
        while j < 3 {
            let mut k = 0;
            while k < 3 {
                let (x, y, z) = (TRIT_VALUES[i], TRIT_VALUES[j], TRIT_VALUES[k]);
                table[lut_index(x, y, z)] = match op {
                    0 => infer_trit(x, y, z),
                    1 => learn_trit(x, y, z),
                    // deduce_a(b, m, r) and deduce_b(a, m, r) share one shape.
                    _ => infer_trit(x, z, y),
                };
                k += 1;
            }
            j += 1;
        }
        i += 1;
    }
    table
}

const INFER: [Trit; 27] = build_table(0);
const LEARN: [Trit; 27] = build_table(1);
const DEDUCE: [Trit; 27] = build_table(2);

#[inline]
fn apply(table: &[Trit; 27], x: TriVector, y: TriVector, z: TriVector) -> TriVector {
    TriVector(core::array::from_fn(|i| table[lut_index(x.0[i], y.0[i], z.0[i])]))
}

// ─── Trigate ────────────────────────────────────────────────────────────────

/// Stateless ternary gate. All operations are associated functions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trigate;

impl Trigate {
    /// Output `R` from inputs `A`, `B` and control `M`.
    pub fn infer(a: TriVector, b: TriVector, m: TriVector) -> TriVector {
        apply(&INFER, a, b, m)
    }

    /// Control `M` that makes `infer(A, B, M) == R`.
    pub fn learn(a: TriVector, b: TriVector, r: TriVector) -> TriVector {
        apply(&LEARN, a, b, r)
    }

    /// Missing first input `A` from `B`, `M` and `R`.
    pub fn deduce_a(b: TriVector, m: TriVector, r: TriVector) -> TriVector {
        apply(&DEDUCE, b, m, r)
    }

    /// Missing second input `B` from `A`, `M` and `R`.
    pub fn deduce_b(a: TriVector, m: TriVector, r: TriVector) -> TriVector {
        apply(&DEDUCE, a, m, r)
    }

    /// Record computed forward: `R = infer(A, B, M)`.
    pub fn from_inputs(a: TriVector, b: TriVector, m: TriVector) -> TrigateRecord {
        TrigateRecord { a, b, m, r: Self::infer(a, b, m) }
    }

    /// Record computed by learning: `M = learn(A, B, R)`.
    pub fn from_learning(a: TriVector, b: TriVector, r: TriVector) -> TrigateRecord {
        TrigateRecord { a, b, m: Self::learn(a, b, r), r }
    }
}

/// The four vectors of one gate evaluation, kept together so they stay coherent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrigateRecord {
    /// First input.
    pub a: TriVector,
    /// Second input.
    pub b: TriVector,
    /// Control law.
    pub m: TriVector,
    /// Output.
    pub r: TriVector,
}

impl TrigateRecord {
    /// `true` when `infer(a, b, m)` reproduces `r` on every position where both are known.
    pub fn is_consistent(&self) -> bool {
        let r_hat = Trigate::infer(self.a, self.b, self.m);
        (0..3).all(|i| {
            let (x, y) = (r_hat.0[i], self.r.0[i]);
            !x.is_known() || !y.is_known() || x == y
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tv;

    fn all_trits() -> impl Iterator<Item = Trit> {
        TRIT_VALUES.into_iter()
    }

    #[test]
    fn test_infer_example() {
        assert_eq!(
            Trigate::infer(tv!(0, 1, 0), tv!(1, 0, 1), tv!(1, 1, 1)),
            tv!(1, 1, 1)
        );
    }

    #[test]
    fn test_infer_with_false_control_is_xnor() {
        assert_eq!(
            Trigate::infer(tv!(0, 1, 1), tv!(0, 0, 1), tv!(0, 0, 0)),
            tv!(1, 0, 1)
        );
    }

    #[test]
    fn test_learn_example_is_fully_known() {
        let m = Trigate::learn(tv!(0, 1, 1), tv!(1, 0, 1), tv!(1, 1, 0));
        assert!(m.is_fully_known(), "m={}", m);
        assert_eq!(m, tv!(1, 1, 1));
    }

    #[test]
    fn test_tables_unknown_in_unknown_out() {
        for x in all_trits() {
            for y in all_trits() {
                for z in all_trits() {
                    if x.is_known() && y.is_known() && z.is_known() {
                        continue;
                    }
                    let v = |t: Trit| TriVector([t; 3]);
                    assert_eq!(Trigate::infer(v(x), v(y), v(z)), TriVector::UNKNOWN);
                    assert_eq!(Trigate::learn(v(x), v(y), v(z)), TriVector::UNKNOWN);
                    assert_eq!(Trigate::deduce_a(v(x), v(y), v(z)), TriVector::UNKNOWN);
                    assert_eq!(Trigate::deduce_b(v(x), v(y), v(z)), TriVector::UNKNOWN);
                }
            }
        }
    }

    #[test]
    fn test_deductions_recover_inputs() {
        for a in [Trit::False, Trit::True] {
            for b in [Trit::False, Trit::True] {
                for m in [Trit::False, Trit::True] {
                    let (va, vb, vm) = (TriVector([a; 3]), TriVector([b; 3]), TriVector([m; 3]));
                    let r = Trigate::infer(va, vb, vm);
                    assert_eq!(Trigate::deduce_a(vb, vm, r), va);
                    assert_eq!(Trigate::deduce_b(va, vm, r), vb);
                }
            }
        }
    }

    #[test]
    fn test_records_are_consistent() {
        let rec = Trigate::from_learning(tv!(1, 0, _), tv!(1, 1, 0), tv!(0, 1, 1));
        assert!(rec.is_consistent());
        assert_eq!(rec.m, tv!(1, 1, _));
        let rec = Trigate::from_inputs(tv!(1, 0, 1), tv!(0, 0, 1), tv!(1, 0, _));
        assert_eq!(rec.r, tv!(1, 1, _));
        assert!(rec.is_consistent());

        let (a, b, m) = (tv!(1, 0, 1), tv!(0, 0, 1), tv!(1, 0, 0));
        assert_eq!(Trigate::infer(a, b, m), tv!(1, 1, 1));
        assert!(TrigateRecord { a, b, m, r: tv!(_, 1, _) }.is_consistent());
        assert!(!TrigateRecord { a, b, m, r: tv!(0, 1, _) }.is_consistent());
    }
}
