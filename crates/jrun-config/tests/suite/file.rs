use std::collections::HashMap;
use std::fs;

use jrun_config::{ConfigError, JrunConfig, LauncherConfig};
use jrun_memory::{GB, MB};
use tempfile::TempDir;

#[test]
fn parses_memory_policy_overrides() {
    let config = JrunConfig::load_from_str(
        r#"
[memory]
small_heap_threshold = "1GiB"
small_heap_ratio = 40
large_heap_ratio = 60

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    let defaults = config.memory.heap_defaults().unwrap();
    assert_eq!(defaults.small_heap_threshold, GB);
    assert_eq!(defaults.small_heap_ratio.percent(), 40);
    assert_eq!(defaults.large_heap_ratio.percent(), 60);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn raw_byte_threshold_is_accepted() {
    let config = JrunConfig::load_from_str("[memory]\nsmall_heap_threshold = 314572800\n").unwrap();
    assert_eq!(
        config.memory.heap_defaults().unwrap().small_heap_threshold,
        300 * MB
    );
}

#[test]
fn empty_file_means_defaults() {
    let config = JrunConfig::load_from_str("").unwrap();
    assert_eq!(config, JrunConfig::default());
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn rejects_unknown_keys_and_bad_ratios() {
    assert!(matches!(
        JrunConfig::load_from_str("[memory]\nhuge_heap_ratio = 10\n"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        JrunConfig::load_from_str("[memory]\nlarge_heap_ratio = 150\n"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        JrunConfig::load_from_str("[memory]\nsmall_heap_threshold = \"big\"\n"),
        Err(ConfigError::Toml(_))
    ));
}

fn launcher_for(app_dir: &std::path::Path, extra: &[(&str, &str)]) -> LauncherConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("JAVA_APP_DIR".into(), app_dir.display().to_string());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    LauncherConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

#[test]
fn discovers_jrun_toml_in_app_dir() {
    let dir = TempDir::new().unwrap();
    let launcher = launcher_for(dir.path(), &[]);
    assert_eq!(launcher.discover_config_path(), None);
    assert_eq!(launcher.load_file_config().unwrap(), JrunConfig::default());

    fs::write(dir.path().join("jrun.toml"), "[memory]\nlarge_heap_ratio = 70\n").unwrap();
    assert_eq!(
        launcher.discover_config_path(),
        Some(dir.path().join("jrun.toml"))
    );
    let loaded = launcher.load_file_config().unwrap();
    assert_eq!(loaded.memory.large_heap_ratio, Some(70));
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let launcher = launcher_for(dir.path(), &[("JRUN_CONFIG_PATH", "missing.toml")]);
    let err = launcher.load_file_config().unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}
