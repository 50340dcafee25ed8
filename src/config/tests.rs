use super::*;
use serial_test::serial;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

#[test]
#[serial]
fn default_config() {
    let config = Config::default();

    assert!(config.fdc_api_key.is_none());
    assert_eq!(config.fdc_base_url, DEFAULT_FDC_BASE_URL);
    assert_eq!(config.oracle_model, DEFAULT_ORACLE_MODEL);
    assert_eq!(config.tier_timeout, Duration::from_secs(45));
    assert_eq!(config.ingredient_budget, Duration::from_secs(300));
    assert_eq!(config.batch_concurrency, 4);
    assert_eq!(config.semantic_candidate_cap, MAX_MERGED_CANDIDATES);
    assert!(!config.diagnostic_nutrition_pass);
}

#[test]
#[serial]
fn from_env_reads_overrides() {
    let config = with_env_vars(
        &[
            ("NUTRIMAP_FDC_API_KEY", "test-key"),
            ("NUTRIMAP_TIER_TIMEOUT_SECS", "10"),
            ("NUTRIMAP_BATCH_CONCURRENCY", "8"),
            ("NUTRIMAP_DIAGNOSTIC_NUTRITION_PASS", "true"),
        ],
        || Config::from_env().expect("config should load"),
    );

    assert_eq!(config.fdc_api_key.as_deref(), Some("test-key"));
    assert_eq!(config.tier_timeout, Duration::from_secs(10));
    assert_eq!(config.batch_concurrency, 8);
    assert!(config.diagnostic_nutrition_pass);
}

#[test]
#[serial]
fn from_env_rejects_unparseable_integers() {
    let result = with_env_vars(&[("NUTRIMAP_TIER_TIMEOUT_SECS", "soon")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::IntParseError { .. })));
}

#[test]
#[serial]
fn from_env_rejects_zero_concurrency() {
    let result = with_env_vars(&[("NUTRIMAP_BATCH_CONCURRENCY", "0")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::ZeroValue { .. })));
}

#[test]
#[serial]
fn blank_api_key_treated_as_unset() {
    let config = with_env_vars(&[("NUTRIMAP_FDC_API_KEY", "   ")], || {
        Config::from_env().expect("config should load")
    });
    assert!(config.fdc_api_key.is_none());
    assert!(matches!(
        config.require_fdc_api_key(),
        Err(ConfigError::MissingEnvVar { .. })
    ));
}

#[test]
#[serial]
fn validate_rejects_oversized_cap() {
    let config = Config {
        semantic_candidate_cap: MAX_MERGED_CANDIDATES + 1,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::CapTooLarge { .. })
    ));
}
