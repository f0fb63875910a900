use anyhow::Result;
use asr_bucketing::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn defaults() {
    let cfg = BucketingConfig::default();
    assert_eq!(cfg.num_buckets, 10);
    assert_eq!(cfg.bucket_method, BucketMethod::EqualLen);
    assert!(!cfg.drop_last);
    assert!(cfg.proportional_sampling);
    assert_eq!(cfg.seed, 0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_fields_take_defaults() -> Result<()> {
    let cfg = BucketingConfig::from_json_str(r#"{ "drop_last": true, "seed": 3 }"#)?;
    assert_eq!(
        cfg,
        BucketingConfig {
            drop_last: true,
            seed: 3,
            ..Default::default()
        }
    );
    Ok(())
}

#[test]
fn bucket_method_names() -> Result<()> {
    assert_eq!("equal_len".parse::<BucketMethod>()?, BucketMethod::EqualLen);
    assert_eq!("equal_duration".parse::<BucketMethod>()?, BucketMethod::EqualDuration);
    assert_eq!(BucketMethod::EqualDuration.to_string(), "equal_duration");
    assert_eq!(
        "EqualLen".parse::<BucketMethod>(),
        Err(SamplingError::UnknownBucketMethod("EqualLen".to_string()))
    );

    let cfg = BucketingConfig::default().with_bucket_method_name("equal_duration")?;
    assert_eq!(cfg.bucket_method, BucketMethod::EqualDuration);
    Ok(())
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(BucketingConfig::from_json_str(r#"{ "bucket_method": "random" }"#).is_err());
    assert!(BucketingConfig::from_json_str("{ not json").is_err());

    let err = BucketingConfig::from_json_str(r#"{ "num_buckets": 0 }"#).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SamplingError>(),
        Some(SamplingError::InvalidConfig(_))
    ));
}

#[test]
fn round_trip_through_file() -> Result<()> {
    let cfg = BucketingConfig {
        num_buckets: 30,
        bucket_method: BucketMethod::EqualDuration,
        drop_last: true,
        proportional_sampling: false,
        seed: 42,
    };
    let mut file = NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(&cfg)?.as_bytes())?;
    file.flush()?;

    assert_eq!(BucketingConfig::from_json_file(file.path())?, cfg);
    Ok(())
}

#[test]
fn missing_file_reports_the_path() {
    let err = BucketingConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err}").contains("/definitely/not/here.json"));
}

#[test]
fn sampler_configs_deserialize() -> Result<()> {
    let single: SingleCutSamplerConfig =
        serde_json::from_str(r#"{ "max_duration": 200.0, "shuffle": true }"#)?;
    assert_eq!(single.max_duration, Some(200.0));
    assert_eq!(single.max_cuts, None);
    assert!(single.shuffle);

    let pairs: CutPairsSamplerConfig =
        serde_json::from_str(r#"{ "max_source_duration": 100.0, "max_target_duration": 50.0 }"#)?;
    assert_eq!(pairs.max_source_duration, Some(100.0));
    assert_eq!(pairs.max_target_duration, Some(50.0));
    assert_eq!(pairs.seed, 0);
    Ok(())
}
