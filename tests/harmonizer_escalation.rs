//! Integration tests for the Harmonizer state machine.

use core::cell::Cell;

use trilaw_core::evolver::{Archetype, DynamicsKey, Proto, RelatorCandidate};
use trilaw_core::harmonizer::MAX_STEPS;
use trilaw_core::{
    tv, AuditRecord, EmptyBank, Evolver, Harmonizer, HarmonizerConfig, HarmonyStep, PatternBank,
    Trigate, TriVector, Wiring, TRIT_VALUES,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Bank whose dynamics prior is empty for the first `quiet_calls` lookups and
/// `late_prior` afterwards. Lets a test drive the machine to the last state.
struct ShiftingPriors {
    calls: Cell<u32>,
    quiet_calls: u32,
    late_prior: TriVector,
    archetypes: Vec<[TriVector; 3]>,
}

impl ShiftingPriors {
    fn new(quiet_calls: u32, late_prior: TriVector) -> Self {
        Self { calls: Cell::new(0), quiet_calls, late_prior, archetypes: Vec::new() }
    }
}

impl PatternBank for ShiftingPriors {
    fn dynamics_top(&self, k: usize) -> Vec<(DynamicsKey, Proto)> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n <= self.quiet_calls || k == 0 {
            return Vec::new();
        }
        vec![(DynamicsKey::Transition("late".into()), Proto::new(self.late_prior, n as u64))]
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

    fn create_new_archetype_triplet(&mut self, triplet: [TriVector; 3], tag: &str) -> Option<Archetype> {
        self.archetypes.push(triplet);
        let [x, y, z] = triplet;
        let ms_super = Trigate::learn(x, y, z);
        Some(Archetype {
            ms_super,
            ss: Trigate::infer(x, y, ms_super),
            components: triplet,
            tag: tag.to_string(),
        })
    }
}

fn learned_parent(children: [TriVector; 3]) -> TriVector {
    Trigate::learn(children[0], children[1], children[2])
}

fn assert_well_formed(audit: &[AuditRecord]) {
    assert!(!audit.is_empty() && audit.len() <= MAX_STEPS);
    assert_eq!(audit[0].step(), HarmonyStep::Soft);
    for w in audit.windows(2) {
        assert!(w[0].step() < w[1].step());
        assert!(!w[0].accepted());
    }
    assert!(audit[audit.len() - 1].accepted());
}

// ─── acceptance ──────────────────────────────────────────────────────────────

#[test]
fn test_consistent_children_accept_without_escalation() {
    let x = [tv!(0, 1, 1), tv!(1, 0, 1), tv!(1, 1, 0)];
    let y = [tv!(1, 0, 0), tv!(0, 0, 1), tv!(0, 1, 0)];
    let z = [tv!(1, 1, 1), tv!(0, 0, 0), tv!(1, 0, 1)];
    let parent = [learned_parent(x), learned_parent(y), learned_parent(z)];
    let config = HarmonizerConfig { max_conflicts: 0, ..Default::default() };
    let res = Harmonizer::new(config)
        .unwrap()
        .harmonize_from_state(&mut EmptyBank, parent, [x, y, z], None);
    assert!(res.repaired);
    assert!(!res.escalated);
    assert!(res.audit.len() <= 2);
    assert_well_formed(&res.audit);
}

#[test]
fn test_wiring_hints_come_from_the_evolver() {
    let x = [tv!(0, 1, 1), tv!(1, 0, 1), tv!(1, 1, 0)];
    let px = learned_parent(x);
    let mut ev = Evolver::default();
    ev.observe_relator(px, Wiring::rotate(1), x);
    let res = Harmonizer::default().harmonize_from_state(&mut ev, [px; 3], [x; 3], None);
    match &res.audit[1] {
        AuditRecord::Contextual { wiring_hints, accepted, .. } => {
            assert!(*accepted);
            assert_eq!(*wiring_hints, [Some(Wiring::rotate(1)); 3]);
        }
        other => panic!("expected contextual record, got {:?}", other),
    }
}

#[test]
fn test_context_shape_steers_soft_rotation() {
    let x = [tv!(_, 1, 0), tv!(_, 0, 0), tv!(_, 1, 1)];
    let observed = [x, x, x];
    let parent = [TriVector::UNKNOWN; 3];
    let res = Harmonizer::default().harmonize_from_state(
        &mut EmptyBank,
        parent,
        observed,
        Some([tv!(1, 1, _); 3]),
    );
    match &res.audit[0] {
        AuditRecord::Soft { rotations, context_present, .. } => {
            assert!(*context_present);
            assert_eq!(*rotations, [2; 3]);
        }
        other => panic!("expected soft record, got {:?}", other),
    }
    assert_eq!(res.state.children[0][0], tv!(1, 0, _));
}

// ─── escalation ──────────────────────────────────────────────────────────────

#[test]
fn test_shifting_priors_escalate_to_archetype() {
    // Component x contradicts its parent at position 0; y and z have no seeds.
    let x = [tv!(1, _, _), tv!(0, _, _), tv!(0, _, _)];
    let unknown = [TriVector::UNKNOWN; 3];
    let parent = [tv!(1, 1, 1), tv!(0, 0, 0), tv!(0, 0, 0)];
    // y and z read an empty prior during CONTEXTUAL and [0,0,0] during STRUCTURAL,
    // which contradicts their parents everywhere.
    let mut bank = ShiftingPriors::new(2, tv!(0, 0, 0));
    let res = Harmonizer::default().harmonize_from_state(&mut bank, parent, [x, unknown, unknown], None);

    assert!(res.repaired);
    assert!(res.escalated);
    assert_eq!(res.audit.len(), MAX_STEPS);
    assert_eq!(res.accepted_at(), Some(HarmonyStep::Archetypal));
    assert_well_formed(&res.audit);
    assert_eq!(bank.archetypes, vec![parent]);
    match &res.audit[4] {
        AuditRecord::Archetypal { archetype: Some(a) } => assert_eq!(a.tag, "harmonizer"),
        other => panic!("expected archetype record, got {:?}", other),
    }
    // The accepted children are the LOCAL output: x flipped at position 0.
    assert_eq!(res.state.children[0], [tv!(0, _, _), tv!(1, _, _), tv!(1, _, _)]);
    assert_eq!(res.state.children[1], unknown);
}

#[test]
fn test_every_state_terminates_within_five_steps() {
    let vectors: Vec<TriVector> = (0..27)
        .map(|n| TriVector::new(TRIT_VALUES[n % 3], TRIT_VALUES[(n / 3) % 3], TRIT_VALUES[n / 9]))
        .collect();
    let mut ev = Evolver::default();
    ev.observe_dynamics_round(&vectors[..9], "warmup");
    for i in 0..27 {
        let trio = [vectors[i], vectors[(i + 5) % 27], vectors[(i + 11) % 27]];
        let parent = [vectors[(i + 2) % 27], vectors[(i + 7) % 27], vectors[(i + 19) % 27]];
        let context = (i % 2 == 0).then_some([vectors[(i + 13) % 27]; 3]);
        for res in [
            Harmonizer::default().harmonize_from_state(&mut EmptyBank, parent, [trio; 3], context),
            Harmonizer::default().harmonize_from_state(&mut ev, parent, [trio; 3], context),
        ] {
            assert!(res.repaired);
            assert_well_formed(&res.audit);
            assert_eq!(res.escalated, res.accepted_at() == Some(HarmonyStep::Archetypal));
        }
    }
}
