use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::global_constants;

fn default_detection_model_url() -> String {
    global_constants::DEFAULT_DETECTION_MODEL_URL.to_string()
}

fn default_recognition_model_url() -> String {
    global_constants::DEFAULT_RECOGNITION_MODEL_URL.to_string()
}

fn default_classify_orientation() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
    #[serde(default = "default_detection_model_url")]
    pub detection_model_url: String,
    #[serde(default = "default_recognition_model_url")]
    pub recognition_model_url: String,
    #[serde(default = "default_classify_orientation")]
    pub classify_orientation: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            models_dir: None,
            detection_model_url: default_detection_model_url(),
            recognition_model_url: default_recognition_model_url(),
            classify_orientation: default_classify_orientation(),
        }
    }
}

impl EngineSettings {
    pub fn load() -> anyhow::Result<Self> {
        let mut settings = match Self::get_settings_file_path() {
            Some(settings_path) => Self::load_from_path(&settings_path)?,
            None => {
                log::debug!("[SETTINGS] Could not determine config directory, using defaults");
                Self::default()
            }
        };

        settings.apply_models_dir_override(
            std::env::var(global_constants::MODELS_DIR_ENV_VAR).ok(),
        );

        Ok(settings)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Failed to read settings file {:?}", settings_path))?;
        let settings: EngineSettings = serde_json::from_str(&contents).map_err(|error| {
            anyhow::anyhow!("Invalid settings file {:?}: {}", settings_path, error)
        })?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!(
            "[SETTINGS] Classify orientation: {}",
            settings.classify_orientation
        );

        Ok(settings)
    }

    pub fn apply_models_dir_override(&mut self, override_value: Option<String>) {
        if let Some(value) = override_value.filter(|value| !value.trim().is_empty()) {
            log::debug!(
                "[SETTINGS] {} overrides models directory: {}",
                global_constants::MODELS_DIR_ENV_VAR,
                value
            );
            self.models_dir = Some(PathBuf::from(value));
        }
    }

    pub fn resolve_models_dir(&self) -> PathBuf {
        self.models_dir
            .clone()
            .or_else(|| {
                dirs::cache_dir().map(|cache_dir| {
                    cache_dir
                        .join(global_constants::APPLICATION_DIR_NAME)
                        .join(global_constants::MODELS_SUBDIR_NAME)
                })
            })
            .unwrap_or_else(|| PathBuf::from(global_constants::MODELS_SUBDIR_NAME))
    }

    fn get_settings_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| {
            config_dir
                .join(global_constants::APPLICATION_DIR_NAME)
                .join(global_constants::SETTINGS_FILE_NAME)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_default_values() {
        let settings = EngineSettings::default();

        assert_eq!(settings.models_dir, None);
        assert_eq!(
            settings.detection_model_url,
            global_constants::DEFAULT_DETECTION_MODEL_URL
        );
        assert_eq!(
            settings.recognition_model_url,
            global_constants::DEFAULT_RECOGNITION_MODEL_URL
        );
        assert!(settings.classify_orientation);
    }

    #[test]
    fn test_engine_settings_deserialization_with_missing_fields_uses_defaults() {
        let json = r#"{ "models_dir": "/opt/ocr-models" }"#;

        let settings: EngineSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.models_dir, Some(PathBuf::from("/opt/ocr-models")));
        assert_eq!(
            settings.detection_model_url,
            global_constants::DEFAULT_DETECTION_MODEL_URL
        );
        assert!(settings.classify_orientation);
    }

    #[test]
    fn test_engine_settings_deserialization_can_disable_orientation() {
        let json = r#"{ "classify_orientation": false }"#;

        let settings: EngineSettings = serde_json::from_str(json).unwrap();

        assert!(!settings.classify_orientation);
        assert_eq!(settings.models_dir, None);
    }

    #[test]
    fn test_load_from_missing_path_returns_defaults() {
        let missing_path = std::env::temp_dir()
            .join("ocr-lines-missing-settings-test")
            .join("settings.json");

        let settings = EngineSettings::load_from_path(&missing_path).unwrap();

        assert_eq!(settings, EngineSettings::default());
        assert!(!missing_path.exists());
    }

    #[test]
    fn test_load_from_path_reads_saved_settings() {
        let temp_dir = std::env::temp_dir().join("ocr-lines-settings-load-test");
        std::fs::create_dir_all(&temp_dir).unwrap();

        let original_settings = EngineSettings {
            models_dir: Some(PathBuf::from("/tmp/models")),
            detection_model_url: "https://example.com/detect.rten".to_string(),
            recognition_model_url: "https://example.com/recognize.rten".to_string(),
            classify_orientation: false,
        };

        let test_file = temp_dir.join("settings.json");
        let contents = serde_json::to_string_pretty(&original_settings).unwrap();
        std::fs::write(&test_file, contents).unwrap();

        let loaded_settings = EngineSettings::load_from_path(&test_file).unwrap();

        assert_eq!(loaded_settings, original_settings);

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_load_from_path_rejects_malformed_json() {
        let temp_dir = std::env::temp_dir().join("ocr-lines-settings-malformed-test");
        std::fs::create_dir_all(&temp_dir).unwrap();

        let test_file = temp_dir.join("settings.json");
        std::fs::write(&test_file, "{ not json").unwrap();

        let result = EngineSettings::load_from_path(&test_file);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid settings file"));

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_load_from_unreadable_path_names_the_settings_file() {
        let temp_dir = std::env::temp_dir().join("ocr-lines-settings-unreadable-test");
        let settings_dir = temp_dir.join("settings.json");
        std::fs::create_dir_all(&settings_dir).unwrap();

        let error = EngineSettings::load_from_path(&settings_dir).unwrap_err();

        assert!(error.to_string().contains("Failed to read settings file"));
        assert!(error.to_string().contains("settings.json"));

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_models_dir_override_replaces_configured_directory() {
        let mut settings = EngineSettings {
            models_dir: Some(PathBuf::from("/configured")),
            ..Default::default()
        };

        settings.apply_models_dir_override(Some("/from-env".to_string()));

        assert_eq!(settings.models_dir, Some(PathBuf::from("/from-env")));
    }

    #[test]
    fn test_blank_models_dir_override_is_ignored() {
        let mut settings = EngineSettings {
            models_dir: Some(PathBuf::from("/configured")),
            ..Default::default()
        };

        settings.apply_models_dir_override(Some("   ".to_string()));
        settings.apply_models_dir_override(None);

        assert_eq!(settings.models_dir, Some(PathBuf::from("/configured")));
    }

    #[test]
    fn test_resolve_models_dir_prefers_configured_directory() {
        let settings = EngineSettings {
            models_dir: Some(PathBuf::from("/configured")),
            ..Default::default()
        };

        assert_eq!(settings.resolve_models_dir(), PathBuf::from("/configured"));
    }

    #[test]
    fn test_resolve_models_dir_falls_back_to_models_subdirectory() {
        let resolved = EngineSettings::default().resolve_models_dir();

        assert!(resolved.ends_with(global_constants::MODELS_SUBDIR_NAME));
    }
}
