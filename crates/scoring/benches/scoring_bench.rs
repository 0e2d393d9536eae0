//! Throughput benchmark for batch entity evaluation.
//! Run with: cargo bench -p campaign-scoring

use campaign_core::config::ScoringConfig;
use campaign_core::types::{ActionEntry, EntityInput, RawInsight};
use campaign_scoring::evaluate_batch;

fn create_test_entities(count: usize) -> Vec<EntityInput> {
    (0..count)
        .map(|i| EntityInput {
            id: format!("campaign-{:05}", i),
            name: format!("Campaign {}", i),
            insights: Some(RawInsight {
                impressions: Some(10_000.0 + i as f64),
                clicks: Some((i % 400) as f64),
                spend: Some((i % 1500) as f64),
                ctr: Some((i % 40) as f64 / 10.0),
                frequency: Some((i % 60) as f64 / 10.0),
                reach: Some(4_000.0),
                actions: vec![ActionEntry::new("lead", (i % 7) as f64)],
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect()
}

fn main() {
    let config = ScoringConfig::default();
    let entities = create_test_entities(10_000);

    // Warmup
    for _ in 0..5 {
        evaluate_batch(&entities, &config).expect("valid config");
    }

    // Benchmark
    let iterations = 100;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        let _ = evaluate_batch(&entities, &config).expect("valid config");
    }

    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!("=== Scoring Benchmark ===");
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per batch:   {:?}", per_iter);
    println!(
        "Throughput:  {:.0} entities/sec",
        (iterations as usize * entities.len()) as f64 / elapsed.as_secs_f64()
    );
}
