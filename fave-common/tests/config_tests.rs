//! Tests for settings loading and config file resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate FAVE_CONFIG are marked with #[serial].

use fave_common::config::{resolve_config_path, LabelPolicy, Settings, CONFIG_ENV_VAR};
use fave_common::{Document, Error, Interval, IntervalTier, TextGridCodec};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_partial_file_keeps_other_defaults() {
    let settings = Settings::from_toml_str(
        r#"
[reconcile]
filler_label = "SIL"

[assembly]
min_fragment_duration = 0.1
"#,
    )
    .unwrap();

    assert_eq!(settings.reconcile.filler_label, "SIL");
    assert!(settings.reconcile.zero_length_fillers);
    assert_eq!(settings.assembly.min_fragment_duration, 0.1);
    assert_eq!(settings.assembly.tier_separator, " - ");
    assert_eq!(settings.codec.decimals, 3);
}

#[test]
fn test_label_policy_parses_lowercase() {
    let settings = Settings::from_toml_str("[codec]\nlabel_policy = \"replace\"\n").unwrap();
    assert_eq!(settings.codec.label_policy, LabelPolicy::Replace);

    let err = Settings::from_toml_str("[codec]\nlabel_policy = \"escape\"\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_invalid_values_rejected() {
    for content in [
        "[codec]\ndecimals = 12\n",
        "[codec]\ndecimals = 8\n",
        "[reconcile]\nfiller_label = \"a\\nb\"\n",
        "[assembly]\nmin_fragment_duration = -1.0\n",
        "[assembly]\ntier_separator = 3\n",
    ] {
        let err = Settings::from_toml_str(content).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "accepted: {}", content);
    }
}

#[test]
fn test_finest_decimals_survive_a_write_read_cycle() {
    let settings = Settings::from_toml_str("[codec]\ndecimals = 6\n").unwrap();
    let codec = TextGridCodec::new(settings.codec);
    let mut tier = IntervalTier::new("phone", 0.0, 2.0);
    tier.append(Interval::new(0.0, 1.234568, "K"));
    tier.append(Interval::new(1.234568, 2.0, "AE"));
    let mut doc = Document::with_domain(0.0, 2.0);
    doc.append(tier);

    let text = codec.serialize(&doc).unwrap();
    assert!(text.contains("xmax = 1.234568\n"));
    assert_eq!(codec.parse(&text).unwrap(), doc);
}

#[test]
fn test_load_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[codec]\ndecimals = \"three\"\n").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(err.to_string().contains("config.toml"), "{}", err);
}

#[test]
#[serial]
fn test_cli_argument_takes_precedence() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/fave-from-env.toml");
    let cli = PathBuf::from("/tmp/fave-from-cli.toml");

    let resolved = resolve_config_path(Some(&cli));
    assert_eq!(resolved, Some(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/fave-from-env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/fave-from-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "");

    let resolved = resolve_config_path(None);
    assert_ne!(resolved, Some(PathBuf::new()));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_loads_file_from_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fave.toml");
    fs::write(&path, "[assembly]\nstyle_tier_name = \"register\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &path);

    let settings = Settings::resolve(None).unwrap();
    assert_eq!(settings.assembly.style_tier_name, "register");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let settings = Settings::resolve(Some(&missing)).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
#[serial]
fn test_broken_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[codec\n").unwrap();

    let err = Settings::resolve(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
