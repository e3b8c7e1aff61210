//! Settings loading and validation.
//!
//! Settings are loaded from a TOML file and merged with environment variables
//! prefixed with `BIDGUARD__`. For example, `BIDGUARD__ACCOUNT__ID` overrides
//! `account.id` in the file.

use std::fs;
use std::path::Path;

use bidguard_common::activity::ActivityInfrastructure;
use bidguard_common::settings::Settings;

use crate::error::CliError;

/// Load settings from `file` with environment overrides applied.
pub(crate) fn load_settings(file: &Path) -> Result<Settings, CliError> {
    let content = fs::read_to_string(file)?;
    log::debug!("Loading settings from: {}", file.display());

    Settings::from_toml(&content)
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e:?}")))
}

/// Compile the `[privacy]` section into an activity gate.
pub(crate) fn build_infrastructure(settings: &Settings) -> Result<ActivityInfrastructure, CliError> {
    ActivityInfrastructure::from_config(&settings.privacy)
        .map_err(|e| CliError::Config(format!("Invalid privacy configuration: {e:?}")))
}

/// Check that the settings parse, validate and compile.
pub fn validate(file: &Path, verbose: bool) -> Result<(), CliError> {
    let settings = load_settings(file)?;
    build_infrastructure(&settings)?;

    println!("Configuration is valid");
    println!("  File: {}", file.display());
    println!("  Account: {}", settings.account.id);

    if verbose {
        let mut bidders: Vec<&String> = settings.bidders.keys().collect();
        bidders.sort();
        println!("\nBidders:");
        for bidder in bidders {
            println!("  - {bidder}");
        }

        let mut activities: Vec<&String> = settings.privacy.activities.keys().collect();
        activities.sort();
        println!("\nActivities:");
        for activity in activities {
            let rules = settings.privacy.activities[activity].rules.len();
            println!("  - {activity}: {rules} rule(s)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let config_path = dir.path().join(name);
        fs::write(&config_path, content).expect("should write config");
        config_path
    }

    #[test]
    fn test_validate_valid_config() {
        let dir = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            &dir,
            "valid.toml",
            r#"
[account]
id = "cli-account"

[bidders.rubicon]
accepted_currencies = ["USD"]
capabilities.site.mediatypes = ["banner"]

[[privacy.activities.fetchBids.rules]]
allow = false
condition = { component_name = ["rubicon"] }
"#,
        );

        assert!(validate(&config_path, true).is_ok());
    }

    #[test]
    fn test_validate_invalid_toml() {
        let dir = TempDir::new().expect("should create temp dir");
        let config_path = write_config(&dir, "invalid.toml", "invalid { toml");

        let result = validate(&config_path, false);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_activity() {
        let dir = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            &dir,
            "unknown-activity.toml",
            r#"
[privacy.activities.teleport]
default = false
"#,
        );

        let result = validate(&config_path, false);
        assert!(
            matches!(&result, Err(CliError::Config(msg)) if msg.contains("teleport")),
            "Should name the unknown activity"
        );
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let dir = TempDir::new().expect("should create temp dir");
        let config_path = dir.path().join("nonexistent.toml");

        assert!(matches!(validate(&config_path, false), Err(CliError::Io(_))));
    }
}
