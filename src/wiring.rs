//! Role assignment of three vectors to the three gates of a synthesis.
//!
//! The base wiring is fixed:
//!
//! ```text
//! gate 0: A, B -> C
//! gate 1: B, C -> A
//! gate 2: C, A -> B
//! ```
//!
//! [`Wiring::rotate`] shifts the gate list cyclically; shifts 0, 1 and 2 are the
//! only distinct permutations. The Transcender walks them in Fibonacci order
//! (see [`Wiring::for_attempt`]).

use core::fmt;

use crate::trit::TriVector;

/// One of the three input vector labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// First vector.
    A,
    /// Second vector.
    B,
    /// Third vector.
    C,
}

impl Slot {
    /// Select the vector this slot names.
    pub fn pick(self, a: TriVector, b: TriVector, c: TriVector) -> TriVector {
        match self {
            Slot::A => a,
            Slot::B => b,
            Slot::C => c,
        }
    }
}

/// Two inputs and one output for a single gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    /// First gate input.
    pub in1: Slot,
    /// Second gate input.
    pub in2: Slot,
    /// Gate output.
    pub out: Slot,
}

impl Role {
    /// Construct a role.
    pub const fn new(in1: Slot, in2: Slot, out: Slot) -> Self {
        Self { in1, in2, out }
    }
}

const BASE_ROLES: [Role; 3] = [
    Role::new(Slot::A, Slot::B, Slot::C),
    Role::new(Slot::B, Slot::C, Slot::A),
    Role::new(Slot::C, Slot::A, Slot::B),
];

/// Ordered roles for the three gates of one synthesis attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wiring(pub [Role; 3]);

impl Wiring {
    /// `(A,B→C), (B,C→A), (C,A→B)`.
    pub const BASE: Wiring = Wiring(BASE_ROLES);

    /// Base wiring with the gate list shifted by `k mod 3`.
    pub fn rotate(k: usize) -> Wiring {
        let s = k % 3;
        Wiring(core::array::from_fn(|i| BASE_ROLES[(i + s) % 3]))
    }

    /// Wiring used by synthesis attempt `k`: shift `fibonacci(k + 2) mod 3`.
    ///
    /// Attempts 0, 1, 2 get shifts 1, 2, 0, so three attempts cover every
    /// distinct wiring once.
    pub fn for_attempt(k: usize) -> Wiring {
        Self::rotate((fibonacci(k + 2) % 3) as usize)
    }

    /// The shift of this wiring relative to [`Wiring::BASE`].
    pub fn shift(&self) -> usize {
        BASE_ROLES
            .iter()
            .position(|r| *r == self.0[0])
            .unwrap_or(0)
    }

    /// Iterate the three roles in gate order.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl Default for Wiring {
    fn default() -> Self {
        Self::BASE
    }
}

impl fmt::Display for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: Slot| match s {
            Slot::A => 'A',
            Slot::B => 'B',
            Slot::C => 'C',
        };
        for (i, r) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}>{}", name(r.in1), name(r.in2), name(r.out))?;
        }
        Ok(())
    }
}

/// Standard Fibonacci number (`F0 = 0, F1 = 1`), saturating on overflow.
pub fn fibonacci(n: usize) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}
