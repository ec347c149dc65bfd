use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load all lua sources from a directory, filtering by config.
///
/// Each `.lua` file becomes one entry keyed by its file stem, ready to hand
/// to the engine as its module table. Files that cannot be read are skipped
/// with a warning rather than failing the whole load.
pub fn load_script_dir(
    dir: &Path,
    script_config: &HashMap<String, toml::Value>,
) -> HashMap<String, String> {
    let mut scripts = HashMap::new();

    if !dir.exists() {
        info!(
            target: "scripting",
            "Script directory does not exist: {} (this is fine if no scripts are being used)",
            dir.display()
        );
        return scripts;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                target: "scripting",
                "Failed to read script directory {}: {}",
                dir.display(),
                e
            );
            return scripts;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        // Only load .lua files
        if path.extension().and_then(|s| s.to_str()) != Some("lua") {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = name.to_owned();

        // Check if this script is enabled in config
        // Default to enabled if not specified in config
        let is_enabled = script_config
            .get(&name)
            .and_then(|config: &toml::Value| config.get("enabled"))
            .and_then(|v: &toml::Value| v.as_bool())
            .unwrap_or(true);

        if !is_enabled {
            info!(
                target: "scripting",
                "Skipping disabled script: {} from {}",
                name,
                path.display()
            );
            continue;
        }

        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                warn!(
                    target: "scripting",
                    "Failed to read script {}: {}",
                    path.display(),
                    e
                );
                continue;
            }
        };

        info!(
            target: "scripting",
            "Loaded script: {} from {}",
            name,
            path.display()
        );
        scripts.insert(name, source);
    }

    if scripts.is_empty() {
        info!(target: "scripting", "No scripts found in {}", dir.display());
    } else {
        info!(target: "scripting", "Loaded {} script(s)", scripts.len());
    }

    scripts
}

/// Get the default scripts directory
pub fn default_script_dir() -> PathBuf {
    use directories::ProjectDirs;
    ProjectDirs::from("", "", "prelua")
        .map(|dirs| dirs.config_dir().join("scripts"))
        .unwrap_or_else(|| PathBuf::from(".scripts"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_script_dir_points_at_scripts() {
        let dir = default_script_dir();
        assert!(dir.to_string_lossy().contains("scripts"));
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let scripts = load_script_dir(&missing, &HashMap::new());
        assert!(scripts.is_empty());
    }

    #[test]
    fn lua_files_load_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("init.lua"), "-- entry").unwrap();
        fs::write(dir.path().join("greeter.lua"), "return {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let scripts = load_script_dir(dir.path(), &HashMap::new());
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts["init"], "-- entry");
        assert_eq!(scripts["greeter"], "return {}");
    }

    #[test]
    fn disabled_scripts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("greeter.lua"), "return {}").unwrap();

        let mut config = HashMap::new();
        config.insert(
            "greeter".to_owned(),
            toml::from_str::<toml::Value>("enabled = false").unwrap(),
        );

        let scripts = load_script_dir(dir.path(), &config);
        assert!(scripts.is_empty());
    }
}
