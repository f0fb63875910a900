use anyhow::Result;
use approx::assert_relative_eq;
use asr_bucketing::testing::*;
use asr_bucketing::*;
use rstest::rstest;

fn cuts_with(durations: &[f64]) -> CutSet {
    CutSet::from_cuts(
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Cut::new(format!("c{i}"), d))
            .collect(),
    )
    .unwrap()
}

fn drain(sampler: &mut impl CutSampler) -> Vec<Batch> {
    std::iter::from_fn(|| sampler.next_batch()).collect()
}

fn sizes(batches: &[Batch]) -> Vec<usize> {
    batches.iter().map(Vec::len).collect()
}

#[rstest]
#[case::duration_limit(&[4.0; 5], Some(10.0), None, vec![2, 2, 1])]
#[case::limit_reached_exactly(&[5.0; 4], Some(10.0), None, vec![2, 2])]
#[case::count_limit(&[1.0; 7], None, Some(3), vec![3, 3, 1])]
#[case::both_limits(&[1.0; 7], Some(2.5), Some(3), vec![2, 2, 2, 1])]
#[case::oversized_cut(&[2.0, 15.0, 3.0], Some(10.0), None, vec![1, 1, 1])]
fn packs_consecutive_cuts(
    #[case] durations: &[f64],
    #[case] max_duration: Option<f64>,
    #[case] max_cuts: Option<usize>,
    #[case] expected: Vec<usize>,
) -> Result<()> {
    let cuts = cuts_with(durations);
    let config = SingleCutSamplerConfig {
        max_duration,
        max_cuts,
        ..Default::default()
    };
    let mut sampler = SingleCutSampler::new(cuts.clone(), false, &config)?;

    assert_eq!(sampler.num_batches(), Some(expected.len()));
    let batches = drain(&mut sampler);
    assert_eq!(sizes(&batches), expected);
    assert_batches_cover(&batches, &cuts);
    assert_eq!(sampler.next_batch(), None);
    Ok(())
}

#[test]
fn batches_follow_collection_order() -> Result<()> {
    let mut sampler = SingleCutSampler::new(
        cuts_with(&[4.0; 5]),
        false,
        &SingleCutSamplerConfig::with_max_duration(10.0),
    )?;
    let batches = drain(&mut sampler);
    assert_eq!(
        batches,
        vec![
            vec!["c0".to_string(), "c1".to_string()],
            vec!["c2".to_string(), "c3".to_string()],
            vec!["c4".to_string()],
        ]
    );
    Ok(())
}

#[test]
fn drop_last_discards_incomplete_tail() -> Result<()> {
    let mut sampler = SingleCutSampler::new(
        cuts_with(&[4.0; 5]),
        true,
        &SingleCutSamplerConfig::with_max_duration(10.0),
    )?;
    assert_eq!(sampler.num_batches(), Some(2));

    let batches = drain(&mut sampler);
    assert_eq!(sizes(&batches), vec![2, 2]);

    let stats = sampler.diagnostics();
    assert_eq!(stats.kept_cuts, 4);
    assert_eq!(stats.kept_batches, 2);
    assert_eq!(stats.discarded_cuts, 1);
    assert_eq!(stats.discarded_batches, 1);
    assert_relative_eq!(stats.discarded_duration, 4.0);
    Ok(())
}

#[test]
fn drop_last_keeps_a_full_tail() -> Result<()> {
    let mut sampler = SingleCutSampler::new(
        cuts_with(&[5.0; 4]),
        true,
        &SingleCutSamplerConfig::with_max_duration(10.0),
    )?;
    assert_eq!(sizes(&drain(&mut sampler)), vec![2, 2]);
    assert_eq!(sampler.diagnostics().discarded_batches, 0);
    Ok(())
}

#[test]
fn filters_skip_cuts_and_are_counted() -> Result<()> {
    let cuts = evenly_spread_cuts(10, 1.0, 10.0);
    let mut sampler = SingleCutSampler::new(cuts, false, &SingleCutSamplerConfig::with_max_cuts(2))?;
    assert_eq!(sampler.num_batches(), Some(5));

    sampler.filter(predicate(|c| c.duration <= 5.0));
    assert_eq!(sampler.num_batches(), None);

    let batches = drain(&mut sampler);
    assert_eq!(sizes(&batches), vec![2, 2, 1]);
    assert!(batches.iter().flatten().all(|id| {
        let i: usize = id.trim_start_matches("cut-").parse().unwrap();
        i < 5
    }));

    let stats = sampler.diagnostics();
    assert_eq!(stats.kept_cuts, 5);
    assert_eq!(stats.discarded_cuts, 5);
    assert_eq!(stats.discarded_batches, 0);
    assert_relative_eq!(stats.discarded_duration, 40.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn filters_compose() -> Result<()> {
    let cuts = evenly_spread_cuts(10, 1.0, 10.0);
    let mut sampler = SingleCutSampler::new(cuts, false, &SingleCutSamplerConfig::with_max_cuts(10))?;
    sampler.filter(predicate(|c| c.duration >= 3.0));
    sampler.filter(predicate(|c| c.duration <= 6.0));

    let batches = drain(&mut sampler);
    assert_eq!(
        batches,
        vec![vec!["cut-2", "cut-3", "cut-4", "cut-5"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()]
    );
    Ok(())
}

#[test]
fn statistics_track_progress() -> Result<()> {
    let mut sampler = SingleCutSampler::new(
        cuts_with(&[4.0; 5]),
        false,
        &SingleCutSamplerConfig::with_max_duration(10.0),
    )?;
    assert_eq!(sampler.num_cuts(), Some(5));
    assert_eq!(sampler.remaining_duration(), Some(20.0));
    assert_eq!(sampler.remaining_cuts(), Some(5));

    sampler.next_batch();
    assert_eq!(sampler.remaining_duration(), Some(12.0));
    assert_eq!(sampler.remaining_cuts(), Some(3));
    assert_eq!(sampler.num_cuts(), Some(5));

    drain(&mut sampler);
    assert_eq!(sampler.remaining_duration(), Some(0.0));
    assert_eq!(sampler.remaining_cuts(), Some(0));

    sampler.reset();
    assert_eq!(sampler.remaining_duration(), Some(20.0));
    Ok(())
}

#[test]
fn lazy_cut_sets_hide_statistics() -> Result<()> {
    let cuts = CutSet::from_cuts_lazy(uniform_cuts(6, 1.0).cuts().to_vec())?;
    let mut sampler = SingleCutSampler::new(cuts, false, &SingleCutSamplerConfig::with_max_cuts(4))?;

    assert_eq!(sampler.remaining_duration(), None);
    assert_eq!(sampler.remaining_cuts(), None);
    assert_eq!(sampler.num_cuts(), None);
    assert_eq!(sampler.num_batches(), None);
    assert_eq!(sizes(&drain(&mut sampler)), vec![4, 2]);
    Ok(())
}

#[test]
fn shuffle_is_deterministic_per_epoch() -> Result<()> {
    let cuts = uniform_cuts(20, 1.0);
    let config = SingleCutSamplerConfig {
        max_cuts: Some(20),
        shuffle: true,
        seed: 7,
        ..Default::default()
    };
    let mut a = SingleCutSampler::new(cuts.clone(), false, &config)?;
    let mut b = SingleCutSampler::new(cuts.clone(), false, &config)?;

    let first = drain(&mut a);
    assert_eq!(first, drain(&mut b));
    assert_batches_cover(&first, &cuts);
    let in_order: Vec<String> = cuts.ids().map(String::from).collect();
    assert_ne!(first[0], in_order);

    a.reset();
    assert_eq!(drain(&mut a), first);

    a.set_epoch(1);
    assert_eq!(a.epoch(), 1);
    a.reset();
    let second = drain(&mut a);
    assert_ne!(second, first);
    assert_batches_cover(&second, &cuts);
    Ok(())
}

#[test]
fn empty_cut_set_yields_nothing() -> Result<()> {
    let mut sampler = SingleCutSampler::new(
        CutSet::default(),
        false,
        &SingleCutSamplerConfig::with_max_duration(10.0),
    )?;
    assert_eq!(sampler.num_batches(), Some(0));
    assert_eq!(sampler.next_batch(), None);
    assert_eq!(sampler.remaining_duration(), Some(0.0));
    Ok(())
}

#[rstest]
#[case::no_limits(SingleCutSamplerConfig::default())]
#[case::zero_duration(SingleCutSamplerConfig::with_max_duration(0.0))]
#[case::negative_duration(SingleCutSamplerConfig::with_max_duration(-1.0))]
#[case::zero_cuts(SingleCutSamplerConfig::with_max_cuts(0))]
fn invalid_limits_are_rejected(#[case] config: SingleCutSamplerConfig) {
    let err = SingleCutSampler::new(uniform_cuts(3, 1.0), false, &config).unwrap_err();
    assert!(matches!(err, SamplingError::InvalidConfig(_)), "{err:?}");
}

#[test]
fn from_bucket_wants_exactly_one_cut_set() {
    let config = SingleCutSamplerConfig::with_max_cuts(2);
    let cuts = uniform_cuts(3, 1.0);

    let err = SingleCutSampler::from_bucket(vec![cuts.clone(), cuts], false, &config).unwrap_err();
    assert_eq!(
        err,
        SamplingError::WrongNumberOfCutSets {
            expected: 1,
            actual: 2
        }
    );
    assert!(SingleCutSampler::from_bucket(vec![uniform_cuts(3, 1.0)], false, &config).is_ok());
}
