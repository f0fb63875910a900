use anyhow::Result;
use approx::assert_relative_eq;
use asr_bucketing::SamplingDiagnostics;
use rstest::rstest;
use tempfile::tempdir;

fn sample(kept: usize, discarded: usize) -> SamplingDiagnostics {
    let mut d = SamplingDiagnostics::default();
    d.record_kept_batch(kept, kept as f64 * 1.5);
    for _ in 0..discarded {
        d.record_discarded_cut(0.5);
    }
    d
}

#[test]
fn merge_is_associative() {
    let (a, b, c) = (sample(3, 1), sample(5, 0), sample(1, 4));
    let left = (a + b) + c;
    let right = a + (b + c);
    assert_eq!(left.kept_cuts, right.kept_cuts);
    assert_eq!(left.discarded_cuts, right.discarded_cuts);
    assert_eq!(left.kept_batches, right.kept_batches);
    assert_relative_eq!(left.kept_duration, right.kept_duration);
    assert_relative_eq!(left.discarded_duration, right.discarded_duration);

    let summed: SamplingDiagnostics = [a, b, c].into_iter().sum();
    assert_eq!(summed.kept_cuts, 9);
    assert_eq!(summed.discarded_cuts, 5);
    assert_eq!(summed.kept_batches, 3);
}

#[test]
fn report_text() {
    let mut d = SamplingDiagnostics::default();
    d.record_kept_batch(2, 6.0);
    d.record_kept_batch(2, 6.0);
    d.record_discarded_batch(1, 3.5);

    assert_eq!(
        d.report(),
        "Sampling statistics:\n\
         Kept 4/5 (80.00%) cuts (1 cuts discarded).\n\
         Kept 2/3 (66.67%) batches (1 batches discarded).\n\
         Overall, 4 seconds of supervision were discarded."
    );
}

#[rstest]
#[case::nothing_sampled(SamplingDiagnostics::default(), "Kept 0/0 (0.00%) cuts")]
#[case::nothing_discarded(sample(4, 0), "Kept 4/4 (100.00%) cuts (0 cuts discarded).")]
fn report_edge_cases(#[case] d: SamplingDiagnostics, #[case] expected: &str) {
    assert!(d.report().contains(expected), "{}", d.report());
}

#[test]
fn save_and_reload() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("diagnostics.json");
    let d = sample(7, 2);

    d.save_to_file(&path)?;
    let reloaded: SamplingDiagnostics = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(reloaded, d);
    Ok(())
}
