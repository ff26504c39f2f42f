use codesearch_gym_core::config::{GymConfig, RewardWeights, DEFAULT_FIXTURES_DIR};
use std::path::PathBuf;

#[test]
fn test_reward_weight_defaults() {
    let weights = RewardWeights::default();
    assert_eq!(weights.alpha, 0.2);
    assert_eq!(weights.beta, 0.5);
    assert_eq!(weights.gamma, 0.2);
    assert_eq!(weights.delta, 0.05);
    assert_eq!(weights.zeta, 0.5);
}

#[test]
fn test_default_fixtures_dir() {
    let config = GymConfig::default();
    assert_eq!(config.fixtures.base_dir, PathBuf::from(DEFAULT_FIXTURES_DIR));
}

#[test]
fn test_load_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[grading]\nmin_f1 = 2.0\n").unwrap();

    let result = GymConfig::load(Some(&path));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("grading.min_f1"));
}

#[test]
fn test_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [tools]
        ast_grep_binary = "sg"

        [reward]
        alpha = 0.0
    "#,
    )
    .unwrap();

    let config = GymConfig::load(Some(&path)).unwrap();
    assert_eq!(config.tools.ast_grep_binary, "sg");
    assert_eq!(config.reward.alpha, 0.0);
    assert_eq!(config.reward.beta, 0.5);
}

#[test]
fn test_init_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    GymConfig::default().save(&path).unwrap();

    let loaded = GymConfig::load(Some(&path)).unwrap();
    assert_eq!(loaded.tools, GymConfig::default().tools);
    assert_eq!(loaded.reward, RewardWeights::default());
}
