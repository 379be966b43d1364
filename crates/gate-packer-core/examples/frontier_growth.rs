use gate_packer_core::prelude::*;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn run(n: usize, dedup: bool, seed: u64) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let gates: Vec<Gate> = (1..=n)
        .map(|i| Gate::new(format!("g{}", i), rng.gen_range(1..=100), rng.gen_range(1..=100)))
        .collect();

    let mut engine = match PackingEngine::with_options(gates, SortStrategy::AreaPerimeter, dedup)
    {
        Ok(e) => e,
        Err(e) => {
            eprintln!("invalid input: {}", e);
            return;
        }
    };
    let mut frontier_sum: u64 = 0;
    let mut placed = 0usize;
    let start = Instant::now();
    loop {
        match engine.place_next() {
            Ok(Some(_)) => {
                placed += 1;
                frontier_sum += engine.candidates().len() as u64;
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        }
    }
    let elapsed = start.elapsed();
    let avg_frontier = if placed > 0 {
        frontier_sum as f64 / placed as f64
    } else {
        0.0
    };
    let eff = engine.layout().map(|l| l.efficiency()).unwrap_or(0.0);
    println!(
        "dedup={} placed={} eff={:.2}% avg_frontier={:.1} final_frontier={} time={}ms",
        dedup,
        placed,
        eff * 100.0,
        avg_frontier,
        engine.candidates().len(),
        elapsed.as_millis()
    );
}

fn main() {
    println!("N=500");
    run(500, false, 1337);
    run(500, true, 1337);
    println!("\nN=1000");
    run(1000, false, 4242);
    run(1000, true, 4242);
}
