use std::sync::Mutex;

use gobundle_core::config::*;
use gobundle_core::errors::ConfigError;

/// Serializes tests that read or write `GOBUNDLE_*` variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "GOBUNDLE_ENTRY_METHOD",
    "GOBUNDLE_ENTRY_FUNCTION",
    "GOBUNDLE_ENTRY_REQUIRED",
    "GOBUNDLE_IMPORTS_DROP_UNUSED",
    "GOBUNDLE_IMPORTS_ADD_MISSING",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = BundleConfig::from_toml("").unwrap();

    assert_eq!(config.entry.effective_method(), "Solve");
    assert_eq!(config.entry.effective_function(), "main");
    assert!(config.entry.effective_required());

    assert!(config.imports.effective_drop_unused());
    assert!(config.imports.effective_add_missing());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[entry]
method = "Run"
required = false

[imports]
add_missing = false
"#;
    let config = BundleConfig::from_toml(toml).unwrap();
    assert_eq!(config.entry.effective_method(), "Run");
    assert!(!config.entry.effective_required());
    // Non-overridden fields keep defaults
    assert_eq!(config.entry.effective_function(), "main");
    assert!(config.imports.effective_drop_unused());
    assert!(!config.imports.effective_add_missing());
}

#[test]
fn config_ignores_unknown_keys() {
    let config = BundleConfig::from_toml("[entry]\nflavour = \"x\"\n").unwrap();
    assert_eq!(config.entry.effective_method(), "Solve");
}

#[test]
fn config_rejects_malformed_toml() {
    let err = BundleConfig::from_toml("[entry\nmethod = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn load_without_file_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let config = BundleConfig::load(None, None).unwrap();
    assert_eq!(config.entry.effective_method(), "Solve");
}

#[test]
fn load_missing_named_file_fails() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let err = BundleConfig::load(Some(&dir.path().join("absent.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn layers_resolve_cli_over_env_over_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gobundle.toml");
    std::fs::write(
        &path,
        "[entry]\nmethod = \"FromFile\"\nfunction = \"main\"\n\n[imports]\ndrop_unused = false\n",
    )
    .unwrap();

    let config = BundleConfig::load(Some(&path), None).unwrap();
    assert_eq!(config.entry.effective_method(), "FromFile");
    assert!(!config.imports.effective_drop_unused());

    std::env::set_var("GOBUNDLE_ENTRY_METHOD", "FromEnv");
    std::env::set_var("GOBUNDLE_IMPORTS_DROP_UNUSED", "true");
    let config = BundleConfig::load(Some(&path), None).unwrap();
    assert_eq!(config.entry.effective_method(), "FromEnv");
    assert!(config.imports.effective_drop_unused());

    let cli = CliOverrides {
        entry_method: Some("FromCli".into()),
        entry_required: Some(false),
    };
    let config = BundleConfig::load(Some(&path), Some(&cli)).unwrap();
    assert_eq!(config.entry.effective_method(), "FromCli");
    assert!(!config.entry.effective_required());

    clear_env();
}

#[test]
fn unparsable_env_booleans_are_ignored() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    std::env::set_var("GOBUNDLE_ENTRY_REQUIRED", "sometimes");
    let config = BundleConfig::load(None, None).unwrap();
    assert!(config.entry.effective_required());
    clear_env();
}

#[test]
fn validation_rejects_non_identifiers() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let cli = CliOverrides {
        entry_method: Some("not valid".into()),
        entry_required: None,
    };
    let err = BundleConfig::load(None, Some(&cli)).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "entry.method"),
        other => panic!("expected ValidationFailed, got {other:?}"),
    }

    let config = BundleConfig::from_toml("[entry]\nfunction = \"9main\"\n").unwrap();
    assert!(BundleConfig::validate(&config).is_err());
    let config = BundleConfig::from_toml("[entry]\nmethod = \"_Solve2\"\n").unwrap();
    assert!(BundleConfig::validate(&config).is_ok());
}

#[test]
fn config_round_trips_through_toml() {
    let config = BundleConfig::from_toml("[entry]\nmethod = \"Run\"\n").unwrap();
    let text = config.to_toml().unwrap();
    let back = BundleConfig::from_toml(&text).unwrap();
    assert_eq!(back.entry.effective_method(), "Run");
}
