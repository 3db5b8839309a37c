/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Pattern memory: three independent banks fed by synthesis results.
//!
//! - **Relator** ([`RelatorKey`]): gate laws per parent law, wiring and role.
//! - **Emergence** ([`EmergenceKey`]): how children laws combine into a parent,
//!   plus coherence marks and registered archetypes.
//! - **Dynamics** ([`DynamicsKey`]): transition laws between consecutive rounds
//!   of the same level tag, plus blockwise level summaries.
//!
//! All three banks share [`Proto::reinforce`]. Every query degrades to an empty
//! answer when nothing matches.
//!
//! # Invariants
//!
//! - Fill-only: a known prototype position never changes (see [`store`]).
//! - Determinism: ranking ties resolve by key order, never hash order.
//! - Time is a logical tick bumped once per reinforcement.

pub mod keys;
pub mod store;

use core::fmt;

use hashbrown::HashMap;
use tracing::debug;

use crate::coherence::CoherenceReport;
use crate::error::ConfigError;
use crate::fractal::{FractalSynthesis, NodeAudit};
use crate::transcender::{MetaM, Synthesis};
use crate::trigate::Trigate;
use crate::trit::{TriVector, Trit};
use crate::wiring::Wiring;

pub use keys::{DynamicsKey, EmergenceKey, RelatorKey};
pub use store::{Bank, Proto};

/// Largest possible similarity between two vectors.
pub const MAX_SIMILARITY: u32 = 3;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Configuration for [`Evolver`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolverConfig {
    /// Minimum parent-law similarity for [`Evolver::select_relator`], 0..=3. Default 2.
    pub th_match: u32,
    /// EMA decay applied on every reinforcement, in `(0, 1]`. Default 0.9.
    pub decay: f32,
    /// Per-bank prototype limit. `None` (default) grows without bound.
    pub bank_capacity: Option<usize>,
}

impl EvolverConfig {
    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.th_match > MAX_SIMILARITY {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "th_match",
                value: self.th_match,
                max: MAX_SIMILARITY,
            });
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ConfigError::DecayOutOfRange { value: self.decay });
        }
        if self.bank_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for EvolverConfig {
    fn default() -> Self {
        Self { th_match: 2, decay: 0.9, bank_capacity: None }
    }
}

// ─── Query results ──────────────────────────────────────────────────────────

/// A relator prototype that matched a parent-law query.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelatorCandidate {
    /// Bank key (parent law, wiring, role).
    pub key: RelatorKey,
    /// Learned gate law.
    pub proto: TriVector,
    /// Prototype weight.
    pub weight: f32,
    /// Observation count.
    pub count: u32,
    /// Similarity between the stored parent law and the query.
    pub similarity: u32,
}

impl RelatorCandidate {
    /// Wiring this candidate was observed under.
    pub fn wiring(&self) -> Wiring {
        self.key.wiring
    }

    /// Ranking score `weight * (similarity + 1)`.
    pub fn score(&self) -> f32 {
        self.weight * (self.similarity + 1) as f32
    }
}

/// A newly registered archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Archetype {
    /// `learn(x, y, z)` over the triplet.
    pub ms_super: TriVector,
    /// `infer(x, y, ms_super)`.
    pub ss: TriVector,
    /// The registered triplet.
    pub components: [TriVector; 3],
    /// Caller-supplied tag.
    pub tag: String,
}

/// A stored archetype found by exact triplet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeMatch {
    /// Stored parent law.
    pub ms_super: TriVector,
    /// Prototype weight.
    pub weight: f32,
    /// Times the triplet was registered.
    pub count: u32,
    /// The queried triplet.
    pub components: [TriVector; 3],
}

/// Prototype counts of the three banks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankSizes {
    /// Relator bank.
    pub relator: usize,
    /// Emergence bank.
    pub emergence: usize,
    /// Dynamics bank.
    pub dynamics: usize,
}

impl fmt::Display for BankSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "relator={} emergence={} dynamics={}",
            self.relator, self.emergence, self.dynamics
        )
    }
}

// ─── PatternBank ────────────────────────────────────────────────────────────

/// Pattern-memory capabilities the Extender and Harmonizer rely on.
pub trait PatternBank {
    /// Best `k` dynamics prototypes.
    fn dynamics_top(&self, k: usize) -> Vec<(DynamicsKey, Proto)>;

    /// Wiring of the strongest relator whose parent law matches `parent`.
    fn select_relator(&self, parent: TriVector) -> Option<Wiring>;

    /// Up to `k` relator candidates under a relaxed threshold.
    fn select_relator_k(&self, parent: TriVector, k: usize) -> Vec<RelatorCandidate>;

    /// Fill the unknown positions of `query` from the closest emergence pattern.
    fn suggest_repair(&self, query: TriVector) -> TriVector;

    /// Register `triplet` as an archetype. `None` if this bank does not store archetypes.
    fn create_new_archetype_triplet(
        &mut self,
        triplet: [TriVector; 3],
        tag: &str,
    ) -> Option<Archetype>;
}

/// A bank that knows nothing. Used when no [`Evolver`] is attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyBank;

impl PatternBank for EmptyBank {
    fn dynamics_top(&self, _k: usize) -> Vec<(DynamicsKey, Proto)> {
        Vec::new()
    }

    fn select_relator(&self, _parent: TriVector) -> Option<Wiring> {
        None
    }

    fn select_relator_k(&self, _parent: TriVector, _k: usize) -> Vec<RelatorCandidate> {
        Vec::new()
    }

    fn suggest_repair(&self, query: TriVector) -> TriVector {
        query.or_false()
    }

    fn create_new_archetype_triplet(
        &mut self,
        _triplet: [TriVector; 3],
        _tag: &str,
    ) -> Option<Archetype> {
        None
    }
}

// ─── Evolver ────────────────────────────────────────────────────────────────

/// Owner of the Relator, Emergence and Dynamics banks.
#[derive(Clone, Debug)]
pub struct Evolver {
    config: EvolverConfig,
    relator: Bank<RelatorKey>,
    emergence: Bank<EmergenceKey>,
    dynamics: Bank<DynamicsKey>,
    /// Previous round per level tag, with the round number it was recorded at.
    last_round: HashMap<String, (u64, Vec<TriVector>)>,
    rounds: u64,
    tick: u64,
}

impl Evolver {
    /// Construct with a validated configuration.
    pub fn new(config: EvolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: EvolverConfig) -> Self {
        let cap = config.bank_capacity;
        Self {
            config,
            relator: Bank::new(cap),
            emergence: Bank::new(cap),
            dynamics: Bank::new(cap),
            last_round: HashMap::new(),
            rounds: 0,
            tick: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EvolverConfig {
        &self.config
    }

    /// Logical clock: number of reinforcements so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Relator bank.
    pub fn relator(&self) -> &Bank<RelatorKey> {
        &self.relator
    }

    /// Emergence bank.
    pub fn emergence(&self) -> &Bank<EmergenceKey> {
        &self.emergence
    }

    /// Dynamics bank.
    pub fn dynamics(&self) -> &Bank<DynamicsKey> {
        &self.dynamics
    }

    /// Prototype counts per bank.
    pub fn bank_sizes(&self) -> BankSizes {
        BankSizes {
            relator: self.relator.len(),
            emergence: self.emergence.len(),
            dynamics: self.dynamics.len(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn reinforce_relator(&mut self, key: RelatorKey, candidate: TriVector) {
        let tick = self.next_tick();
        self.relator.reinforce(key, candidate, self.config.decay, tick);
    }

    fn reinforce_emergence(&mut self, key: EmergenceKey, candidate: TriVector) {
        let tick = self.next_tick();
        self.emergence.reinforce(key, candidate, self.config.decay, tick);
    }

    fn reinforce_dynamics(&mut self, key: DynamicsKey, candidate: TriVector) {
        let tick = self.next_tick();
        self.dynamics.reinforce(key, candidate, self.config.decay, tick);
    }

    // ─── Observation ────────────────────────────────────────────────────

    /// Store each gate law under `(parent, wiring, role)`.
    pub fn observe_relator(&mut self, parent: TriVector, wiring: Wiring, laws: [TriVector; 3]) {
        for (role, law) in (0u8..).zip(laws) {
            self.reinforce_relator(RelatorKey { parent, wiring, role }, law);
        }
    }

    /// Store the ideal parent law, the signature-keyed `ms` and the shape.
    pub fn observe_emergence(&mut self, children: [TriVector; 3], ms: TriVector) {
        let [m1, m2, m3] = children;
        self.reinforce_emergence(EmergenceKey::Ideal, Trigate::learn(m1, m2, m3));
        self.reinforce_emergence(EmergenceKey::Signature(children), ms);
        self.reinforce_emergence(EmergenceKey::Shape, Trigate::infer(m1, m2, ms));
    }

    /// Learn transitions from the previous round of `level_tag` and blockwise
    /// summaries of this round. The round becomes the new "previous" for the tag.
    pub fn observe_dynamics_round(&mut self, ms_list: &[TriVector], level_tag: &str) {
        if let Some((_, prev)) = self.last_round.remove(level_tag) {
            for (&p, &c) in prev.iter().zip(ms_list) {
                self.reinforce_dynamics(
                    DynamicsKey::Transition(level_tag.to_string()),
                    Trigate::learn(p, c, c),
                );
            }
        }
        for block in ms_list.chunks_exact(3) {
            self.reinforce_dynamics(
                DynamicsKey::LevelSummary(level_tag.to_string()),
                Trigate::learn(block[0], block[1], block[2]),
            );
        }
        self.rounds += 1;
        self.last_round.insert(level_tag.to_string(), (self.rounds, ms_list.to_vec()));
        if let Some(cap) = self.config.bank_capacity {
            while self.last_round.len() > cap {
                self.forget_oldest_round();
            }
        }
    }

    /// Drop the least recently observed level tag.
    fn forget_oldest_round(&mut self) {
        let oldest = self
            .last_round
            .iter()
            .min_by_key(|(_, (round, _))| *round)
            .map(|(tag, _)| tag.clone());
        if let Some(tag) = oldest {
            debug!(%tag, "forgetting previous round");
            self.last_round.remove(&tag);
        }
    }

    /// Number of level tags with a remembered previous round.
    pub fn tracked_levels(&self) -> usize {
        self.last_round.len()
    }

    /// Feed one Transcender result into Relator and Emergence.
    pub fn observe_synthesis(&mut self, synthesis: &Synthesis) {
        self.observe_parts(synthesis.meta, synthesis.wiring, synthesis.coherence.as_ref());
    }

    /// Feed one fractal node audit into Relator and Emergence.
    pub fn observe_node(&mut self, node: &NodeAudit) {
        self.observe_parts(node.meta, node.wiring, node.coherence.as_ref());
    }

    fn observe_parts(&mut self, meta: MetaM, wiring: Wiring, coherence: Option<&CoherenceReport>) {
        let children = meta.children();
        self.observe_relator(meta.ms(), wiring, children);
        self.observe_emergence(children, meta.ms());
        if let Some(report) = coherence {
            let t = report.totals;
            let mark = TriVector::from_bools([
                t.null_filled > 0,
                t.conflict_resolved > 0,
                t.kept_observed > 0,
            ]);
            self.reinforce_emergence(EmergenceKey::CoherenceParent(report.parent), mark);
        }
    }

    /// Feed a whole fractal synthesis: cross `Ms` per level into Dynamics under
    /// `"{level_name}:lvl27"`, `":lvl9"` and `":lvl3"`, and every node audit into
    /// Relator and Emergence.
    pub fn observe_fractal(&mut self, result: &FractalSynthesis, level_name: &str) {
        let cross = &result.tensor_cross;
        self.observe_dynamics_round(&cross.level_27, &format!("{}:lvl27", level_name));
        self.observe_dynamics_round(&cross.level_9, &format!("{}:lvl9", level_name));
        self.observe_dynamics_round(&cross.level_3, &format!("{}:lvl3", level_name));
        let audits = &result.audits;
        for node in audits.level_27.iter().chain(&audits.level_9).chain(&audits.level_3) {
            self.observe_node(node);
        }
        debug!(level_name, sizes = %self.bank_sizes(), "observed fractal synthesis");
    }

    // ─── Queries ────────────────────────────────────────────────────────

    /// Best `k` relator prototypes.
    pub fn relator_top(&self, k: usize) -> Vec<(RelatorKey, Proto)> {
        self.relator.top(k)
    }

    /// Best `k` emergence prototypes.
    pub fn emergence_top(&self, k: usize) -> Vec<(EmergenceKey, Proto)> {
        self.emergence.top(k)
    }

    /// Best `k` dynamics prototypes.
    pub fn dynamics_top(&self, k: usize) -> Vec<(DynamicsKey, Proto)> {
        self.dynamics.top(k)
    }

    /// Wiring of the heaviest relator whose parent law has similarity `>= th_match`
    /// to `parent`.
    pub fn select_relator(&self, parent: TriVector) -> Option<Wiring> {
        self.relator
            .iter()
            .filter(|(k, _)| k.parent.similarity(&parent) >= self.config.th_match)
            .max_by(|(ka, a), (kb, b)| a.weight.total_cmp(&b.weight).then_with(|| kb.cmp(ka)))
            .map(|(k, _)| k.wiring)
    }

    /// Up to `k` relators with similarity `>= th_match - 1`, ranked by
    /// `weight * (similarity + 1)`.
    pub fn select_relator_k(&self, parent: TriVector, k: usize) -> Vec<RelatorCandidate> {
        let th = self.config.th_match.saturating_sub(1);
        let mut out: Vec<RelatorCandidate> = self
            .relator
            .iter()
            .filter_map(|(key, p)| {
                let similarity = key.parent.similarity(&parent);
                (similarity >= th).then_some(RelatorCandidate {
                    key: *key,
                    proto: p.proto,
                    weight: p.weight,
                    count: p.count,
                    similarity,
                })
            })
            .collect();
        out.sort_by(|a, b| b.score().total_cmp(&a.score()).then_with(|| a.key.cmp(&b.key)));
        out.truncate(k);
        out
    }

    /// Fill unknown positions of `query` from the emergence prototype with the
    /// most matching known bits. Falls back to `False` when the bank is empty.
    pub fn suggest_repair(&self, query: TriVector) -> TriVector {
        if query.is_fully_known() {
            return query;
        }
        let best = self
            .emergence
            .iter()
            .max_by(|(ka, a), (kb, b)| {
                a.proto
                    .similarity(&query)
                    .cmp(&b.proto.similarity(&query))
                    .then_with(|| kb.cmp(ka))
            })
            .map(|(_, p)| p.proto);
        match best {
            Some(source) => {
                let mut out = query;
                out.fill_unknowns_from(&source);
                out
            }
            None => query.or_false(),
        }
    }

    /// Register `triplet` as an archetype under its exact signature and `tag`.
    pub fn create_new_archetype_triplet(&mut self, triplet: [TriVector; 3], tag: &str) -> Archetype {
        let [x, y, z] = triplet;
        let ms_super = Trigate::learn(x, y, z);
        let ss = Trigate::infer(x, y, ms_super);
        self.reinforce_emergence(EmergenceKey::ArchetypeTriplet(triplet), ms_super);
        self.reinforce_emergence(EmergenceKey::ArchetypeShape(tag.to_string()), ss);
        debug!(tag, ms_super = %ms_super, "registered archetype");
        Archetype { ms_super, ss, components: triplet, tag: tag.to_string() }
    }

    /// Archetype previously registered for exactly `triplet`.
    pub fn query_archetype_by_triplet(&self, triplet: [TriVector; 3]) -> Option<ArchetypeMatch> {
        self.emergence
            .get(&EmergenceKey::ArchetypeTriplet(triplet))
            .map(|p| ArchetypeMatch {
                ms_super: p.proto,
                weight: p.weight,
                count: p.count,
                components: triplet,
            })
    }

    /// Coherence mark `[filled, conflict, kept]` learned for `parent`.
    pub fn coherence_mark(&self, parent: TriVector) -> Option<TriVector> {
        self.emergence
            .get(&EmergenceKey::CoherenceParent(parent))
            .map(|p| p.proto)
    }

    /// `true` when the learned mark for `parent` has never seen a conflict.
    pub fn parent_is_stable(&self, parent: TriVector) -> bool {
        self.coherence_mark(parent)
            .map_or(false, |m| m[1] == Trit::False)
    }
}

impl Default for Evolver {
    fn default() -> Self {
        Self::from_valid(EvolverConfig::default())
    }
}

impl PatternBank for Evolver {
    fn dynamics_top(&self, k: usize) -> Vec<(DynamicsKey, Proto)> {
        Evolver::dynamics_top(self, k)
    }

    fn select_relator(&self, parent: TriVector) -> Option<Wiring> {
        Evolver::select_relator(self, parent)
    }

    fn select_relator_k(&self, parent: TriVector, k: usize) -> Vec<RelatorCandidate> {
        Evolver::select_relator_k(self, parent, k)
    }

    fn suggest_repair(&self, query: TriVector) -> TriVector {
        Evolver::suggest_repair(self, query)
    }

    fn create_new_archetype_triplet(
        &mut self,
        triplet: [TriVector; 3],
        tag: &str,
    ) -> Option<Archetype> {
        Some(Evolver::create_new_archetype_triplet(self, triplet, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcender::Transcender;
    use crate::tv;

    #[test]
    fn test_config_validation() {
        assert!(EvolverConfig::default().validate().is_ok());
        let bad = EvolverConfig { th_match: 4, ..Default::default() };
        assert!(matches!(
            Evolver::new(bad),
            Err(ConfigError::ThresholdOutOfRange { name: "th_match", value: 4, max: 3 })
        ));
        for decay in [0.0, -0.5, 1.5, f32::NAN] {
            let bad = EvolverConfig { decay, ..Default::default() };
            assert!(matches!(bad.validate(), Err(ConfigError::DecayOutOfRange { .. })));
        }
        let bad = EvolverConfig { bank_capacity: Some(0), ..Default::default() };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_observe_relator_stores_one_proto_per_role() {
        let mut ev = Evolver::default();
        let parent = tv!(1, 0, 1);
        ev.observe_relator(parent, Wiring::BASE, [tv!(0, 0, 0), tv!(1, 1, 1), tv!(0, 1, 0)]);
        assert_eq!(ev.bank_sizes().relator, 3);
        let key = RelatorKey { parent, wiring: Wiring::BASE, role: 1 };
        assert_eq!(ev.relator().get(&key).unwrap().proto, tv!(1, 1, 1));
        assert_eq!(ev.tick(), 3);
    }

    #[test]
    fn test_observe_emergence_keys() {
        let mut ev = Evolver::default();
        let children = [tv!(1, 0, 1), tv!(0, 1, 1), tv!(1, 1, 0)];
        let ms = Trigate::learn(children[0], children[1], children[2]);
        ev.observe_emergence(children, ms);
        assert_eq!(ev.emergence().get(&EmergenceKey::Ideal).unwrap().proto, ms);
        assert_eq!(ev.emergence().get(&EmergenceKey::Signature(children)).unwrap().proto, ms);
        assert_eq!(
            ev.emergence().get(&EmergenceKey::Shape).unwrap().proto,
            Trigate::infer(children[0], children[1], ms)
        );
    }

    #[test]
    fn test_dynamics_round_learns_transitions_per_tag() {
        let mut ev = Evolver::default();
        let r1 = [tv!(0, 0, 0), tv!(1, 1, 1), tv!(0, 1, 0)];
        let r2 = [tv!(1, 0, 0), tv!(1, 1, 1), tv!(0, 1, 1)];
        ev.observe_dynamics_round(&r1, "a");
        assert!(ev.dynamics().get(&DynamicsKey::Transition("a".into())).is_none());
        assert!(ev.dynamics().get(&DynamicsKey::LevelSummary("a".into())).is_some());

        // A different tag has no previous round yet.
        ev.observe_dynamics_round(&r2, "b");
        assert!(ev.dynamics().get(&DynamicsKey::Transition("b".into())).is_none());

        ev.observe_dynamics_round(&r2, "a");
        let t = ev.dynamics().get(&DynamicsKey::Transition("a".into())).unwrap();
        assert_eq!(t.count, 3);
        assert_eq!(t.proto, Trigate::learn(r1[0], r2[0], r2[0]));
    }

    #[test]
    fn test_observe_synthesis_records_coherence_mark() {
        let mut ev = Evolver::default();
        let s = Transcender::default().solve(tv!(1, 0, 1), tv!(0, 1, 0), tv!(1, 1, 0));
        ev.observe_synthesis(&s);
        let report = s.coherence.unwrap();
        let mark = ev.coherence_mark(report.parent).unwrap();
        assert_eq!(mark, tv!(0, 0, 0));
        assert!(ev.parent_is_stable(report.parent));
        assert_eq!(ev.bank_sizes().relator, 3);
    }

    #[test]
    fn test_select_relator_respects_threshold() {
        let mut ev = Evolver::default();
        let w1 = Wiring::rotate(1);
        ev.observe_relator(tv!(1, 1, 0), w1, [tv!(0, 0, 0); 3]);
        assert_eq!(ev.select_relator(tv!(1, 1, 1)), Some(w1));
        assert_eq!(ev.select_relator(tv!(0, 0, 1)), None);
        assert_eq!(EmptyBank.select_relator(tv!(1, 1, 0)), None);
    }

    #[test]
    fn test_select_relator_k_relaxed_and_ranked() {
        let mut ev = Evolver::default();
        ev.observe_relator(tv!(1, 0, 0), Wiring::rotate(2), [tv!(1, 1, 1); 3]);
        ev.observe_relator(tv!(1, 1, 1), Wiring::BASE, [tv!(0, 0, 0); 3]);
        // Query [1,1,1]: the first parent has similarity 1 (relaxed pass), the second 3.
        let cands = ev.select_relator_k(tv!(1, 1, 1), 4);
        assert_eq!(cands.len(), 4);
        assert_eq!(cands[0].similarity, 3);
        assert_eq!(cands[0].wiring(), Wiring::BASE);
        assert!(cands.windows(2).all(|w| w[0].score() >= w[1].score()));
        assert_eq!(ev.select_relator_k(tv!(1, 1, 1), 2).len(), 2);
        assert!(ev.select_relator_k(tv!(0, 1, 1), 3).iter().all(|c| c.similarity >= 1));
    }

    #[test]
    fn test_suggest_repair() {
        let mut ev = Evolver::default();
        assert_eq!(ev.suggest_repair(tv!(1, _, _)), tv!(1, 0, 0));
        ev.observe_emergence([tv!(1, 1, 1), tv!(1, 1, 1), tv!(1, 1, 1)], tv!(1, 1, 1));
        assert_eq!(ev.suggest_repair(tv!(1, _, _)), tv!(1, 1, 1));
        assert_eq!(ev.suggest_repair(tv!(0, 1, 0)), tv!(0, 1, 0));
    }

    #[test]
    fn test_archetype_roundtrip() {
        let mut ev = Evolver::default();
        let triplet = [tv!(1, 0, 1), tv!(0, 0, 1), tv!(1, 1, 1)];
        assert!(ev.query_archetype_by_triplet(triplet).is_none());
        let arch = ev.create_new_archetype_triplet(triplet, "demo");
        assert_eq!(arch.ms_super, Trigate::learn(triplet[0], triplet[1], triplet[2]));
        assert_eq!(arch.ss, triplet[2]);
        let found = ev.query_archetype_by_triplet(triplet).unwrap();
        assert_eq!(found.ms_super, arch.ms_super);
        assert_eq!(found.count, 1);
        assert!(ev.emergence().contains_key(&EmergenceKey::ArchetypeShape("demo".into())));
        assert!(EmptyBank.create_new_archetype_triplet(triplet, "demo").is_none());
    }
}
