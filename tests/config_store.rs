// Tests for config loading and saving through an explicit context.
use std::time::Duration;
use worddb::config::Config;
use worddb::context::{AppContext, TestContext};

#[test]
fn test_missing_config_is_detected() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));
}

#[test]
fn test_save_then_load_roundtrip() {
    let ctx = TestContext::new();
    let mut config = Config::default();
    config.server_url = "https://words.example".to_string();
    config.csrf_token = "abc123".to_string();
    config.templates.add_list.title = "Create list".to_string();
    config.save(&ctx).unwrap();

    let loaded = Config::load(&ctx).unwrap();
    assert_eq!(loaded, config);
    assert!(Config::get_path_string(&ctx).unwrap().ends_with("config.toml"));
}

#[test]
fn test_partial_file_gets_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    std::fs::write(
        &path,
        "server_url = \"http://10.0.0.2:8000\"\nrequest_timeout_secs = 0\n\n[templates.edit_word]\ntitle = \"Fix word\"\nfocus = \"meaning\"\nfields = [{ name = \"word\", label = \"Word\" }, { name = \"meaning\", label = \"Meaning\", multiline = true }]\n",
    )
    .unwrap();

    let config = Config::load(&ctx).unwrap();
    assert_eq!(config.server_url, "http://10.0.0.2:8000");
    assert_eq!(config.flash_delay(), Duration::from_millis(8000));
    assert_eq!(config.error_background, "#F60018");
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.templates.edit_word.title, "Fix word");
    assert_eq!(config.templates.edit_word.fields.len(), 2);
    // Untouched templates keep their defaults.
    assert_eq!(config.templates.add_word.title, "Add word");
}

#[test]
fn test_malformed_file_is_not_missing() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    std::fs::write(&path, "server_url = [not toml").unwrap();

    let err = Config::load(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
}

#[test]
fn test_log_level_parsing() {
    let config = Config {
        log_level: "debug".to_string(),
        ..Config::default()
    };
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);

    let config = Config {
        log_level: "loud".to_string(),
        ..Config::default()
    };
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
}
