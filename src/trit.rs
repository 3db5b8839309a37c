//! Three-valued logic values and fixed-length ternary vectors.
//!
//! - [`Trit`]: one of `False`, `True`, `Unknown`. `Unknown` is an ordinary value
//!   of the algebra, never an error.
//! - [`TriVector`]: exactly three trits, the atomic unit every other module
//!   computes on.
//!
//! # Normalization
//!
//! Raw input of any length is coerced to exactly three positions: extra
//! entries are dropped, missing entries are padded with `False`. Raw integer
//! values other than `1` are read as `False`; `None` is `Unknown`.

use core::fmt;
use core::ops::Index;

// ─── Trit ───────────────────────────────────────────────────────────────────

/// A ternary truth value.
///
/// The derived ordering (`False < True < Unknown`) only exists so composite
/// bank keys can be totally ordered for deterministic tie-breaking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trit {
    /// Known false (`0`).
    #[default]
    False,
    /// Known true (`1`).
    True,
    /// Unknown / undetermined.
    Unknown,
}

/// All three trit values in table order. Lookup tables are indexed the same way.
pub const TRIT_VALUES: [Trit; 3] = [Trit::False, Trit::True, Trit::Unknown];

impl Trit {
    /// Known trit from a boolean.
    pub const fn from_bool(b: bool) -> Self {
        if b {
            Trit::True
        } else {
            Trit::False
        }
    }

    /// Coerce a raw value: `None → Unknown`, `Some(1) → True`, anything else `→ False`.
    pub const fn from_raw(v: Option<i64>) -> Self {
        match v {
            None => Trit::Unknown,
            Some(1) => Trit::True,
            Some(_) => Trit::False,
        }
    }

    /// `true` for `False` and `True`.
    pub const fn is_known(self) -> bool {
        !matches!(self, Trit::Unknown)
    }

    /// The boolean value, or `None` when unknown.
    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Trit::False => Some(false),
            Trit::True => Some(true),
            Trit::Unknown => None,
        }
    }

    /// Table index: `False = 0`, `True = 1`, `Unknown = 2`.
    pub const fn index(self) -> usize {
        match self {
            Trit::False => 0,
            Trit::True => 1,
            Trit::Unknown => 2,
        }
    }

    /// Exclusive or; unknown if either side is unknown.
    pub const fn xor(self, other: Trit) -> Trit {
        match (self.to_bool(), other.to_bool()) {
            (Some(a), Some(b)) => Trit::from_bool(a != b),
            _ => Trit::Unknown,
        }
    }

    /// Equivalence (negated xor); unknown if either side is unknown.
    pub const fn xnor(self, other: Trit) -> Trit {
        match (self.to_bool(), other.to_bool()) {
            (Some(a), Some(b)) => Trit::from_bool(a == b),
            _ => Trit::Unknown,
        }
    }

    /// Negation; `Unknown` stays `Unknown`.
    pub const fn not(self) -> Trit {
        match self {
            Trit::False => Trit::True,
            Trit::True => Trit::False,
            Trit::Unknown => Trit::Unknown,
        }
    }

    /// Single-character rendering: `0`, `1` or `·`.
    pub const fn symbol(self) -> char {
        match self {
            Trit::False => '0',
            Trit::True => '1',
            Trit::Unknown => '·',
        }
    }
}

impl From<bool> for Trit {
    fn from(b: bool) -> Self {
        Trit::from_bool(b)
    }
}

impl From<Option<bool>> for Trit {
    fn from(v: Option<bool>) -> Self {
        v.map_or(Trit::Unknown, Trit::from_bool)
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ─── TriVector ──────────────────────────────────────────────────────────────

/// Ordered, fixed-length-3 ternary vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriVector(pub [Trit; 3]);

impl TriVector {
    /// `[0,0,0]`, the neutral vector.
    pub const ZERO: TriVector = TriVector([Trit::False; 3]);

    /// `[·,·,·]`, nothing known.
    pub const UNKNOWN: TriVector = TriVector([Trit::Unknown; 3]);

    /// Build from three trits.
    pub const fn new(a: Trit, b: Trit, c: Trit) -> Self {
        TriVector([a, b, c])
    }

    /// Fully known vector from three booleans.
    pub const fn from_bools(bits: [bool; 3]) -> Self {
        TriVector([
            Trit::from_bool(bits[0]),
            Trit::from_bool(bits[1]),
            Trit::from_bool(bits[2]),
        ])
    }

    /// Normalize a trit slice of any length to exactly three positions.
    pub fn from_slice(v: &[Trit]) -> Self {
        let mut out = Self::ZERO;
        for (slot, &t) in out.0.iter_mut().zip(v.iter()) {
            *slot = t;
        }
        out
    }

    /// Normalize raw values (`None`/integers) of any length to three positions.
    pub fn from_raw(v: &[Option<i64>]) -> Self {
        let mut out = Self::ZERO;
        for (slot, &raw) in out.0.iter_mut().zip(v.iter()) {
            *slot = Trit::from_raw(raw);
        }
        out
    }

    /// Apply `f` position-wise over two vectors.
    #[inline]
    pub fn zip_with(self, other: TriVector, f: impl Fn(Trit, Trit) -> Trit) -> TriVector {
        TriVector([
            f(self.0[0], other.0[0]),
            f(self.0[1], other.0[1]),
            f(self.0[2], other.0[2]),
        ])
    }

    /// Iterate the three positions in order.
    pub fn iter(&self) -> impl Iterator<Item = Trit> + '_ {
        self.0.iter().copied()
    }

    /// Number of known positions (0–3).
    pub fn known_count(&self) -> u32 {
        self.0.iter().filter(|t| t.is_known()).count() as u32
    }

    /// Number of unknown positions (0–3).
    pub fn unknown_count(&self) -> u32 {
        3 - self.known_count()
    }

    /// `true` when no position is known.
    pub fn is_fully_unknown(&self) -> bool {
        self.0.iter().all(|t| !t.is_known())
    }

    /// `true` when every position is known.
    pub fn is_fully_known(&self) -> bool {
        self.0.iter().all(|t| t.is_known())
    }

    /// Count of positions where both sides are known and equal (0–3).
    pub fn similarity(&self, other: &TriVector) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a.is_known() && a == b)
            .count() as u32
    }

    /// Right cyclic rotation by `s` positions: `rotate(1)` of `[a,b,c]` is `[c,a,b]`.
    pub fn rotate(&self, s: usize) -> TriVector {
        let s = s % 3;
        TriVector(core::array::from_fn(|i| self.0[(i + 3 - s) % 3]))
    }

    /// Fill unknown positions from `source` where `source` is known.
    ///
    /// Known positions are never overwritten. Returns the number of positions filled.
    pub fn fill_unknowns_from(&mut self, source: &TriVector) -> u32 {
        let mut filled = 0;
        for (slot, &s) in self.0.iter_mut().zip(source.0.iter()) {
            if !slot.is_known() && s.is_known() {
                *slot = s;
                filled += 1;
            }
        }
        filled
    }

    /// Copy with every unknown position replaced by `False`.
    pub fn or_false(&self) -> TriVector {
        TriVector(self.0.map(|t| if t.is_known() { t } else { Trit::False }))
    }
}

impl Index<usize> for TriVector {
    type Output = Trit;

    fn index(&self, i: usize) -> &Trit {
        &self.0[i]
    }
}

impl From<[Trit; 3]> for TriVector {
    fn from(v: [Trit; 3]) -> Self {
        TriVector(v)
    }
}

impl From<[bool; 3]> for TriVector {
    fn from(v: [bool; 3]) -> Self {
        TriVector::from_bools(v)
    }
}

impl fmt::Display for TriVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.0[0], self.0[1], self.0[2])
    }
}

/// Shorthand for a vector literal with `0`, `1` and `None`-style positions.
///
/// ```
/// use trilaw_core::{tv, Trit, TriVector};
/// assert_eq!(tv!(1, 0, _), TriVector::new(Trit::True, Trit::False, Trit::Unknown));
/// ```
#[macro_export]
macro_rules! tv {
    (@t _) => { $crate::Trit::Unknown };
    (@t 0) => { $crate::Trit::False };
    (@t 1) => { $crate::Trit::True };
    ($a:tt, $b:tt, $c:tt) => {
        $crate::TriVector::new($crate::tv!(@t $a), $crate::tv!(@t $b), $crate::tv!(@t $c))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_normalization_pads_and_truncates() {
        assert_eq!(TriVector::from_raw(&[Some(1)]), tv!(1, 0, 0));
        assert_eq!(
            TriVector::from_raw(&[Some(0), None, Some(1), Some(1)]),
            tv!(0, _, 1)
        );
        assert_eq!(TriVector::from_raw(&[]), TriVector::ZERO);
    }

    #[test]
    fn test_raw_non_binary_values_coerce_to_false() {
        assert_eq!(TriVector::from_raw(&[Some(7), Some(-1), Some(1)]), tv!(0, 0, 1));
    }

    #[test]
    fn test_from_slice_pads_with_false() {
        assert_eq!(TriVector::from_slice(&[Trit::Unknown]), tv!(_, 0, 0));
    }

    #[test]
    fn test_xor_propagates_unknown() {
        for &t in TRIT_VALUES.iter() {
            assert_eq!(t.xor(Trit::Unknown), Trit::Unknown);
            assert_eq!(Trit::Unknown.xnor(t), Trit::Unknown);
        }
        assert_eq!(Trit::True.xor(Trit::False), Trit::True);
        assert_eq!(Trit::True.xnor(Trit::False), Trit::False);
    }

    #[test]
    fn test_similarity_ignores_unknown() {
        let a = tv!(1, _, 0);
        let b = tv!(1, _, 1);
        assert_eq!(a.similarity(&b), 1);
        assert_eq!(TriVector::UNKNOWN.similarity(&TriVector::UNKNOWN), 0);
        assert_eq!(a.similarity(&a), 2);
    }

    #[test]
    fn test_rotate_is_right_cyclic() {
        let v = tv!(1, 0, _);
        assert_eq!(v.rotate(0), v);
        assert_eq!(v.rotate(1), tv!(_, 1, 0));
        assert_eq!(v.rotate(2), tv!(0, _, 1));
        assert_eq!(v.rotate(3), v);
    }

    #[test]
    fn test_fill_unknowns_never_overwrites_known() {
        let mut v = tv!(1, _, _);
        let filled = v.fill_unknowns_from(&tv!(0, 1, _));
        assert_eq!(filled, 1);
        assert_eq!(v, tv!(1, 1, _));
    }

    #[test]
    fn test_counts_and_display() {
        let v = tv!(_, 1, 0);
        assert_eq!(v.known_count(), 2);
        assert_eq!(v.unknown_count(), 1);
        assert_eq!(v.or_false(), tv!(0, 1, 0));
        assert_eq!(format!("{}", v), "[·,1,0]");
    }
}
