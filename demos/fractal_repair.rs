//! End-to-end walk: synthesize three tensors, learn from the result, then
//! repair a damaged reconstruction.
//!
//! ```text
//! RUST_LOG=trilaw_core=debug cargo run --example fractal_repair
//! ```

use trilaw_core::{
    tv, Evolver, EvolverConfig, Extender, FractalTensor, FractalTranscender, Harmonizer,
    HarmonizerConfig, TriVector,
};

fn tensor(seed: usize) -> FractalTensor {
    let l27: Vec<TriVector> = (0..27)
        .map(|i| {
            let n = (i * 3 + seed) % 8;
            TriVector::from_bools([n & 1 == 1, n & 2 == 2, n & 4 == 4])
        })
        .collect();
    FractalTensor::from_level_27(&l27)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trilaw_core=info".into()),
        )
        .init();

    // 1. Synthesis
    let (a, b, c) = (tensor(1), tensor(4), tensor(6));
    let synth = FractalTranscender::default().synthesize(&a, &b, &c);
    println!("=== Cross synthesis ===\n{}\n", synth.tensor_cross);

    // 2. Learning
    let mut evolver = Evolver::new(EvolverConfig { bank_capacity: Some(256), ..Default::default() })?;
    for round in 0..3 {
        evolver.observe_fractal(&synth, &format!("demo{}", round % 2));
    }
    println!("banks: {}", evolver.bank_sizes());
    for (key, p) in evolver.emergence_top(3) {
        println!("  {:<40} {} w={:.3} n={}", key.to_string(), p.proto, p.weight, p.count);
    }

    // 3. Reconstruction from the level-3 parent laws
    let parent = synth.tensor_cross.level_3;
    let ext = Extender::new(&evolver).extend_triplet(parent, None);
    println!("\n=== Extension ===");
    for (d, comp) in ext.components.iter().enumerate() {
        println!(
            "  component {}: {:?} hint={:?} filled={}",
            d,
            comp.children.map(|v| v.to_string()),
            comp.wiring_hint.map(|w| w.to_string()),
            comp.report.totals.null_filled
        );
    }

    // 4. Repair of a damaged observation
    let mut observed = ext.children();
    observed[0][1] = tv!(_, _, _);
    observed[1][2] = observed[1][2].rotate(1);
    let harmonizer = Harmonizer::new(HarmonizerConfig::default())?;
    let res = harmonizer.harmonize_from_state(&mut evolver, parent, observed, None);
    println!("\n=== Harmony ===");
    for record in res.audit.iter() {
        println!("  {:<11} accepted={}", record.step().to_string(), record.accepted());
    }
    println!(
        "repaired={} escalated={} accepted_at={:?}",
        res.repaired,
        res.escalated,
        res.accepted_at()
    );
    Ok(())
}
