//! Bucketing sampler walkthrough.
//!
//! Demonstrates:
//! - Equal-length vs. equal-duration buckets
//! - Proportional bucket selection over two epochs
//! - Source/target pair bucketing
//! - Filtering and the sampling report
//!
//! Run with: cargo run --example bucketing_demo

use anyhow::Result;
use asr_bucketing::*;

/// A toy corpus: durations cycle through 1..=20 seconds.
fn corpus(n: usize) -> Result<CutSet> {
    let cuts = (0..n)
        .map(|i| Cut::new(format!("utt-{i:04}"), 1.0 + ((i * 7) % 20) as f64))
        .collect();
    Ok(CutSet::from_cuts(cuts)?)
}

fn describe(buckets: &[Bucket]) {
    for (i, bucket) in buckets.iter().enumerate() {
        let cuts = &bucket[0];
        println!(
            "  bucket {i}: {:>3} cuts, {:>7.1}s total",
            cuts.len(),
            cuts.total_duration()
        );
    }
}

fn main() -> Result<()> {
    println!("🪣 Duration Bucketing Example\n");

    let cuts = corpus(500)?;
    println!("Corpus: {} cuts, {:.1}s\n", cuts.len(), cuts.total_duration());

    // =============================================================================
    // EXAMPLE 1: Bucket builders
    // =============================================================================
    println!("📊 Example 1: Bucket builders");
    println!("equal_len:");
    describe(&create_buckets(&[cuts.clone()], 4, BucketMethod::EqualLen)?);
    println!("equal_duration:");
    describe(&create_buckets(&[cuts.clone()], 4, BucketMethod::EqualDuration)?);
    println!();

    // =============================================================================
    // EXAMPLE 2: Sampling two epochs
    // =============================================================================
    println!("🎲 Example 2: Sampling two epochs");
    let config = BucketingConfig {
        num_buckets: 4,
        bucket_method: BucketMethod::EqualDuration,
        seed: 42,
        ..Default::default()
    };
    let mut sampler: BucketingSampler<SingleCutSampler> = BucketingSampler::new(
        vec![cuts.clone()],
        &config,
        &SingleCutSamplerConfig {
            max_duration: Some(120.0),
            shuffle: true,
            ..Default::default()
        },
    )?;
    println!("Batches per epoch: {:?}", sampler.num_batches());

    for epoch in 0..2 {
        sampler.set_epoch(epoch);
        sampler.start_epoch();
        let mut per_bucket = vec![0usize; sampler.num_buckets()];
        let mut order = Vec::new();
        while let Some((bucket, _batch)) = sampler.next_batch_with_bucket() {
            per_bucket[bucket] += 1;
            order.push(bucket);
        }
        let head: Vec<String> = order.iter().take(12).map(ToString::to_string).collect();
        println!(
            "  epoch {epoch}: batches per bucket {per_bucket:?}, first picks {}",
            head.join(" ")
        );
    }
    println!();

    // =============================================================================
    // EXAMPLE 3: Source/target pairs
    // =============================================================================
    println!("🔁 Example 3: Source/target pairs");
    let targets = CutSet::from_cuts(
        cuts.iter()
            .rev()
            .map(|c| Cut::new(c.id.clone(), c.duration * 0.6))
            .collect(),
    )?;
    let mut pairs: BucketingSampler<CutPairsSampler> = BucketingSampler::new(
        vec![cuts.clone(), targets],
        &config,
        &CutPairsSamplerConfig {
            max_source_duration: Some(120.0),
            max_target_duration: Some(60.0),
            ..Default::default()
        },
    )?;
    let batches: Vec<Batch> = pairs.iter_epoch().collect();
    let largest = batches.iter().map(Vec::len).max().unwrap_or(0);
    println!("  {} pair batches, largest holds {largest} pairs\n", batches.len());

    // =============================================================================
    // EXAMPLE 4: Filtering and the report
    // =============================================================================
    println!("🧹 Example 4: Filtering");
    sampler.filter(predicate(|c| c.duration <= 15.0));
    let kept: usize = sampler.iter_epoch().map(|b| b.len()).sum();
    println!("  kept {kept} cuts this epoch");
    println!("\n{}", sampler.report());

    Ok(())
}
