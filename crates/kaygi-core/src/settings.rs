use crate::error::KaygiError;
use crate::report::DEFAULT_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "kaygi.json";

/// Where the pipeline finds its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model_path: PathBuf,
    pub history_path: PathBuf,
    pub font_path: PathBuf,
    pub report_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            model_path: PathBuf::from("models/anxiety_model.json"),
            history_path: PathBuf::from("tahmin_gecmisi.csv"),
            font_path: PathBuf::from("DejaVuSans.ttf"),
            report_file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load a settings file. Relative paths inside it resolve against the
    /// file's own directory; fields it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Settings, KaygiError> {
        let content = std::fs::read_to_string(path).map_err(|e| KaygiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| KaygiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if settings.report_file_name.trim().is_empty() {
            return Err(KaygiError::Config {
                path: path.to_path_buf(),
                reason: "report_file_name must not be empty".into(),
            });
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(settings.resolved_against(base))
    }

    /// Use `explicit` if given, else `kaygi.json` in the working directory if
    /// present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Settings, KaygiError> {
        if let Some(path) = explicit {
            return Settings::load(path);
        }
        let fallback = Path::new(DEFAULT_SETTINGS_FILE);
        if fallback.exists() {
            log::debug!("using settings from {}", fallback.display());
            return Settings::load(fallback);
        }
        Ok(Settings::default())
    }

    fn resolved_against(self, base: &Path) -> Settings {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Settings {
            model_path: resolve(self.model_path),
            history_path: resolve(self.history_path),
            font_path: resolve(self.font_path),
            report_file_name: self.report_file_name,
        }
    }
}
