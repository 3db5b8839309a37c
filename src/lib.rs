//! # trilaw-core
//!
//! Deterministic ternary-logic synthesis, learning and repair.
//!
//! ---
//!
//! ## Three-valued laws instead of gradients
//!
//! Every value is a [`Trit`]: `False`, `True` or `Unknown`. `Unknown` is not an
//! error; it flows through every operation and surfaces as ambiguity in the
//! result. The atomic unit is a [`TriVector`] of exactly three trits.
//!
//! **Synthesis** ([`Transcender`]) takes three vectors and learns the laws that
//! link them pairwise, then the law that links those laws. A parent law must
//! reproduce each child (absolute coherence), so conflicting observations are
//! overridden from the top down and counted.
//!
//! **Learning** ([`Evolver`]) folds synthesis results into three pattern banks.
//! Known positions of a learned prototype never change afterwards.
//!
//! **Reconstruction and repair** ([`Extender`], [`Harmonizer`]) run the other
//! way: children from a parent law, escalating through five repair states
//! until one accepts.
//!
//! ## The pipeline
//!
//! ```text
//! A, B, C (FractalTensor) ──▶ FractalTranscender ──▶ FractalSynthesis
//!                                  │  27 → 9 → 3            │
//!                               Transcender                 ▼
//!                                  │                     Evolver
//!                               Trigate          (Relator, Emergence, Dynamics)
//!                                                           │ PatternBank
//!                             Ms triplet + observed ──▶ Harmonizer ──▶ HarmonyResult
//!                                                           │
//!                                                        Extender
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`trit`] | [`Trit`], [`TriVector`] | Three-valued values and length-3 normalization |
//! | [`trigate`] | [`Trigate`], [`TrigateRecord`] | Table-driven infer / learn / deduce |
//! | [`wiring`] | [`Wiring`], [`Role`], [`Slot`] | Gate role assignments and Fibonacci rotation |
//! | [`coherence`] | [`CoherenceReport`], [`ReconcileStats`] | Absolute-coherence reconciliation |
//! | [`transcender`] | [`Transcender`], [`Synthesis`], [`MetaM`] | Triple synthesis with wiring search |
//! | [`fractal`] | [`FractalTensor`], [`FractalTranscender`] | 27/9/3 cross and self synthesis |
//! | [`evolver`] | [`Evolver`], [`PatternBank`] | Pattern banks with EMA weights and fill-only prototypes |
//! | [`extender`] | [`Extender`], [`TripletExtension`] | Top-down reconstruction of children |
//! | [`harmonizer`] | [`Harmonizer`], [`HarmonyResult`] | Five-state escalating repair |
//! | [`error`] | [`ConfigError`] | Configuration validation |
//!
//! ## Quick start
//!
//! ```
//! use trilaw_core::{tv, Evolver, FractalTensor, FractalTranscender};
//!
//! let a = FractalTensor::from_level_27(&[tv!(1, 0, 1); 27]);
//! let b = FractalTensor::from_level_27(&[tv!(0, 1, 0); 27]);
//! let c = FractalTensor::from_level_27(&[tv!(1, 1, _); 27]);
//!
//! let result = FractalTranscender::default().synthesize(&a, &b, &c);
//! assert_eq!(result.audits.level_27.len(), 27);
//!
//! let mut evolver = Evolver::default();
//! evolver.observe_fractal(&result, "quickstart");
//! assert!(evolver.bank_sizes().dynamics > 0);
//! ```
//!
//! ## Determinism
//!
//! Nothing reads a clock or a random source. Evolver recency is a logical tick
//! and every ranking breaks ties by key order, so the same inputs always give
//! the same banks and answers.
//!
//! ## Logging
//!
//! Emits [`tracing`] events (`trace` per synthesis attempt and new prototype,
//! `debug` per fractal level and repair state, `info` on archetypal escalation).
//! Installing a subscriber is left to the host.
//!
//! ## License
//!
//! Business Source License 1.1. See `LICENSE` in the root directory.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod trit;
pub mod trigate;
pub mod wiring;
pub mod coherence;
pub mod transcender;
pub mod fractal;
pub mod evolver;
pub mod extender;
pub mod harmonizer;
pub mod error;

pub use coherence::{CoherenceReport, ReconcileStats};
pub use error::ConfigError;
pub use evolver::{EmptyBank, Evolver, EvolverConfig, PatternBank};
pub use extender::{reconstruct_vectors, Component, Extender, KnownPair, TripletExtension};
pub use fractal::{FractalSynthesis, FractalTensor, FractalTranscender};
pub use harmonizer::{AuditRecord, Harmonizer, HarmonizerConfig, HarmonyResult, HarmonyStep};
pub use transcender::{MetaM, Synthesis, Transcender, TranscenderConfig};
pub use trigate::{Trigate, TrigateRecord};
pub use trit::{TriVector, Trit, TRIT_VALUES};
pub use wiring::{Role, Slot, Wiring};
