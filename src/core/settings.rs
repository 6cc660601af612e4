/// Widget settings persistence
///
/// Settings live in a JSON document nested under the "SwapWatch" namespace
/// key. The same file may carry sibling namespaces owned by other tools, so
/// every write is read-merge-write: the whole document is loaded, the target
/// leaf is set along a dot-separated path, and the whole document is written
/// back with siblings untouched.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{NAMESPACE_KEY, SETTINGS_FILE_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 2, y: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub always_on_top: bool,
    pub draggable: bool,
    pub track_ram_usage: bool,
    pub window_position: WindowPosition,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            always_on_top: true,
            draggable: true,
            track_ram_usage: false,
            window_position: WindowPosition::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the settings file path: next to the running executable,
    /// falling back to the user config directory when the executable
    /// location cannot be determined.
    pub fn default_path() -> PathBuf {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(SETTINGS_FILE_NAME);
            }
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swapwatch")
            .join(SETTINGS_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, merging persisted values over defaults.
    ///
    /// A missing, truncated, or malformed file yields defaults; individual
    /// missing keys get their defaults while present keys are kept. This
    /// never fails: the widget must come up regardless of file state.
    pub fn load(&self) -> Settings {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Settings::default();
        };

        let Ok(document) = serde_json::from_str::<Value>(&content) else {
            warn!(
                "settings file {} is not valid JSON, using defaults",
                self.path.display()
            );
            return Settings::default();
        };

        match document.get(NAMESPACE_KEY) {
            Some(section) => {
                serde_json::from_value(section.clone()).unwrap_or_else(|e| {
                    warn!("settings namespace is malformed ({}), using defaults", e);
                    Settings::default()
                })
            }
            None => Settings::default(),
        }
    }

    /// Set one value under the namespace, identified by a dot-separated path
    /// (e.g. "window_position.x"), and write the merged document back.
    ///
    /// Best-effort: failures are logged and swallowed, the in-memory value
    /// stays authoritative for the running session.
    pub fn save(&self, key_path: &str, value: Value) {
        if let Err(e) = self.try_save(key_path, value) {
            warn!("failed to persist setting {}: {}", key_path, e);
        }
    }

    /// Replace the whole namespace object with the given settings,
    /// preserving sibling namespaces.
    pub fn save_all(&self, settings: &Settings) {
        if let Err(e) = self.try_save_all(settings) {
            warn!("failed to persist settings: {}", e);
        }
    }

    fn try_save(&self, key_path: &str, value: Value) -> anyhow::Result<()> {
        let mut root = self.read_document();

        let section = root
            .entry(NAMESPACE_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        if let Some(section) = section.as_object_mut() {
            let parts: Vec<&str> = key_path.split('.').collect();
            set_path(section, &parts, value);
        }

        self.write_document(&root)
    }

    fn try_save_all(&self, settings: &Settings) -> anyhow::Result<()> {
        let mut root = self.read_document();
        root.insert(NAMESPACE_KEY.to_string(), serde_json::to_value(settings)?);
        self.write_document(&root)
    }

    /// Read the whole document, starting from an empty object when the file
    /// is missing or unparseable (a corrupt file is overwritten on save).
    fn read_document(&self) -> Map<String, Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .and_then(|document| match document {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn write_document(&self, document: &Map<String, Value>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(document)?)?;
        Ok(())
    }
}

/// Walk/create intermediate objects along a dotted path and set the leaf.
/// Non-object intermediates are replaced by fresh objects.
fn set_path(map: &mut Map<String, Value>, parts: &[&str], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(child) = entry.as_object_mut() {
                set_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nope.json"));

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_load_corrupt_file_yields_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let store = SettingsStore::new(file.path());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_load_merges_missing_keys_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "SwapWatch": {{ "always_on_top": false }} }}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        let settings = store.load();

        assert!(!settings.always_on_top);
        // Missing keys come back as defaults
        assert!(settings.draggable);
        assert!(!settings.track_ram_usage);
        assert_eq!(settings.window_position, WindowPosition::default());
    }

    #[test]
    fn test_save_then_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("widget_settings.json"));

        store.save("window_position.x", json!(42));

        let settings = store.load();
        assert_eq!(settings.window_position.x, 42);
        // Untouched keys keep their defaults
        assert!(settings.always_on_top);
        assert_eq!(settings.window_position.y, WindowPosition::default().y);
    }

    #[test]
    fn test_save_preserves_sibling_namespaces() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "OtherTool": {{ "theme": "dark", "nested": {{ "a": 1 }} }} }}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        store.save("draggable", json!(false));

        let document: Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(
            document["OtherTool"],
            json!({ "theme": "dark", "nested": { "a": 1 } })
        );
        assert_eq!(document["SwapWatch"]["draggable"], json!(false));
    }

    #[test]
    fn test_save_into_corrupt_file_starts_fresh() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "garbage").unwrap();

        let store = SettingsStore::new(file.path());
        store.save("always_on_top", json!(false));

        let settings = store.load();
        assert!(!settings.always_on_top);
    }

    #[test]
    fn test_save_creates_intermediate_objects() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("widget_settings.json"));

        store.save("window_position.y", json!(7));
        store.save("window_position.x", json!(3));

        let settings = store.load();
        assert_eq!(settings.window_position, WindowPosition { x: 3, y: 7 });
    }

    #[test]
    fn test_save_all_replaces_namespace_only() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "OtherTool": {{ "kept": true }}, "SwapWatch": {{ "always_on_top": false }} }}"#
        )
        .unwrap();

        let store = SettingsStore::new(file.path());
        store.save_all(&Settings::default());

        let document: Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(document["OtherTool"], json!({ "kept": true }));
        assert_eq!(document["SwapWatch"]["always_on_top"], json!(true));
    }
}
