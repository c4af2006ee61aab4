use crate::error::{Result, ScoreError};
use crate::types::config::{ScoringRules, WalletScoreConfig};
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "wallet-score.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".wallet-score/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/wallet-score/config.toml";

pub fn load_rules(root: &Path, explicit: Option<&Path>) -> Result<ScoringRules> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_rules_with_global(root, explicit, global.as_deref())
}

pub(crate) fn load_rules_with_global(
    root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<ScoringRules> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ScoreError::ConfigParse(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            merge_file_if_exists(&mut merged, path)?;
        }
        None => merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?,
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: WalletScoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| ScoreError::ConfigParse(e.to_string()))?;
    let rules = cfg.rules();
    rules.validate()?;
    tracing::debug!(?rules, "resolved scoring rules");
    Ok(rules)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

pub fn render_rules(rules: &ScoringRules) -> Result<String> {
    let mut root = Map::new();
    root.insert("rules".to_string(), Value::try_from(rules)?);
    Ok(toml::to_string_pretty(&Value::Table(root))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_rules_defaults_when_no_files_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let rules = load_rules_with_global(dir.path(), None, None).expect("load should not fail");
        assert_eq!(rules, ScoringRules::default());
    }

    #[test]
    fn load_rules_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[rules]
liquidation_penalty = 150
deposit_reward_cap = 100
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[rules]
liquidation_penalty = 450
leverage_multiple = "0.75"
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".wallet-score")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[rules]
leverage_multiple = "2"
"#,
        )
        .expect("local override should write");

        let rules = load_rules_with_global(root.path(), None, Some(&global_path))
            .expect("load should succeed");

        assert_eq!(rules.liquidation_penalty, dec!(450));
        assert_eq!(rules.deposit_reward_cap, dec!(100));
        assert_eq!(rules.leverage_multiple, dec!(2));
        assert_eq!(rules.baseline, dec!(500));
    }

    #[test]
    fn explicit_config_replaces_repo_file() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[rules]\nbaseline = 450\n",
        )
        .expect("repo config should write");
        let explicit = root.path().join("strict.toml");
        fs::write(&explicit, "[rules]\nliquidation_penalty = 500\n")
            .expect("explicit config should write");

        let rules = load_rules_with_global(root.path(), Some(&explicit), None)
            .expect("load should succeed");
        assert_eq!(rules.baseline, dec!(500));
        assert_eq!(rules.liquidation_penalty, dec!(500));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        let err = load_rules_with_global(root.path(), Some(&root.path().join("nope.toml")), None)
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_rules_fail_validation() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[rules]\nlow_repayment_threshold = \"1.5\"\n",
        )
        .expect("repo config should write");
        let err = load_rules_with_global(root.path(), None, None)
            .expect_err("threshold above 1 should fail");
        assert!(err.to_string().contains("rules.low_repayment_threshold"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[rules\nbaseline = ")
            .expect("repo config should write");
        let err = load_rules_with_global(root.path(), None, None)
            .expect_err("malformed toml should fail");
        assert!(matches!(err, ScoreError::ConfigParse(_)));
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn float_rule_values_are_rejected() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[rules]\nlow_repayment_threshold = 0.1\n",
        )
        .expect("repo config should write");
        let err = load_rules_with_global(root.path(), None, None)
            .expect_err("float should fail");
        assert!(matches!(err, ScoreError::ConfigParse(_)));
        assert!(err.to_string().contains("quoted decimal string"));
    }

    #[test]
    fn liquidation_penalty_must_outweigh_rewards() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[rules]\nliquidation_penalty = 200\n",
        )
        .expect("repo config should write");
        let err = load_rules_with_global(root.path(), None, None)
            .expect_err("penalty below the reward caps should fail");
        assert!(err.to_string().contains("rules.liquidation_penalty"));
    }

    #[test]
    fn rendered_rules_load_back() {
        let root = TempDir::new().expect("root temp dir should be created");
        let rules = ScoringRules {
            low_repayment_threshold: dec!(0.35),
            ..ScoringRules::default()
        };
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            render_rules(&rules).expect("rules should render"),
        )
        .expect("rendered config should write");
        let loaded = load_rules_with_global(root.path(), None, None).expect("load should succeed");
        assert_eq!(loaded, rules);
    }
}
