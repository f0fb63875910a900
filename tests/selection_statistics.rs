//! Statistical checks of bucket selection, driven by scripted samplers so the
//! remaining durations stay fixed for the whole run.

use anyhow::Result;
use asr_bucketing::testing::ScriptedSampler;
use asr_bucketing::*;
use rstest::rstest;

const PULLS: usize = 20_000;

/// Bucket 0 reports ten times the remaining duration of buckets 1..=3.
fn skewed_buckets() -> Vec<ScriptedSampler> {
    let mut samplers = vec![ScriptedSampler::new("big", PULLS * 2).with_remaining_duration(Some(10.0))];
    samplers.extend(
        (1..4).map(|i| ScriptedSampler::new(format!("small{i}"), PULLS * 2).with_remaining_duration(Some(1.0))),
    );
    samplers
}

#[allow(clippy::cast_precision_loss)]
fn big_bucket_share(sampler: &mut BucketingSampler<ScriptedSampler>) -> f64 {
    sampler.start_epoch();
    let hits = (0..PULLS)
        .filter_map(|_| sampler.next_batch_with_bucket())
        .filter(|(bucket, _)| *bucket == 0)
        .count();
    hits as f64 / PULLS as f64
}

#[test]
fn proportional_sampling_favors_longer_buckets() -> Result<()> {
    let config = BucketingConfig {
        seed: 5,
        ..Default::default()
    };
    let mut sampler = BucketingSampler::from_samplers(skewed_buckets(), &config, false)?;
    assert_eq!(sampler.samplers()[0].label(), "big");

    // 1/16 + (6/16) * (10/11) ~= 0.403
    let share = big_bucket_share(&mut sampler);
    assert!((0.36..0.45).contains(&share), "big bucket share {share}");
    Ok(())
}

#[rstest]
#[case::uniform_by_config(false, false)]
#[case::lazy_input(true, true)]
fn uniform_selection_ignores_durations(#[case] proportional: bool, #[case] lazy: bool) -> Result<()> {
    let config = BucketingConfig {
        proportional_sampling: proportional,
        seed: 5,
        ..Default::default()
    };
    let mut sampler = BucketingSampler::from_samplers(skewed_buckets(), &config, lazy)?;

    let share = big_bucket_share(&mut sampler);
    assert!((0.22..0.28).contains(&share), "big bucket share {share}");
    Ok(())
}

#[rstest]
#[case::zero(Some(0.0))]
#[case::unknown(None)]
fn degenerate_durations_still_drain_every_bucket(#[case] remaining: Option<f64>) -> Result<()> {
    let samplers = (0..5)
        .map(|i| ScriptedSampler::new(format!("b{i}"), 3 + i).with_remaining_duration(remaining))
        .collect();
    let mut sampler = BucketingSampler::from_samplers(samplers, &BucketingConfig::default(), false)?;

    assert_eq!(sampler.num_batches(), Some(25));
    assert_eq!(sampler.iter_epoch().count(), 25);
    assert!(sampler.is_depleted());
    assert!(
        sampler
            .samplers()
            .iter()
            .enumerate()
            .all(|(i, s)| s.yielded() == 3 + i)
    );
    Ok(())
}

#[test]
fn buckets_drain_at_comparable_rates() -> Result<()> {
    let samplers = vec![
        ScriptedSampler::new("a", 1000).with_remaining_duration(Some(4.0)),
        ScriptedSampler::new("b", 1000).with_remaining_duration(Some(4.0)),
    ];
    let config = BucketingConfig {
        seed: 17,
        ..Default::default()
    };
    let mut sampler = BucketingSampler::from_samplers(samplers, &config, false)?;
    sampler.start_epoch();
    for _ in 0..1000 {
        sampler.next_batch_with_bucket();
    }
    let yielded: Vec<usize> = sampler.samplers().iter().map(ScriptedSampler::yielded).collect();
    assert!(yielded.iter().all(|&n| (400..600).contains(&n)), "{yielded:?}");
    Ok(())
}
