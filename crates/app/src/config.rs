use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "fatura.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template workbook. Relative paths resolve against the config file's directory.
    pub template_path: PathBuf,
    pub sheet_name: String,
    /// Where processed workbooks go; the template's directory when unset.
    pub output_dir: Option<PathBuf>,
    pub ocr: OcrSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    /// Tried in order, then the engine default.
    pub languages: Vec<String>,
    /// Tesseract `tessdata` directory.
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(fatura_storage::DEFAULT_TEMPLATE),
            sheet_name: fatura_storage::DEFAULT_SHEET.to_string(),
            output_dir: None,
            ocr: OcrSection::default(),
        }
    }
}

impl Default for OcrSection {
    fn default() -> Self {
        Self { languages: vec!["por".to_string(), "eng".to_string()], data_path: None }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.template_path.is_relative() {
            self.template_path = base.join(&self.template_path);
        }
        if let Some(dir) = self.output_dir.take() {
            self.output_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        self
    }

    /// Loads the first config file found in [`search_paths`]; defaults when
    /// none exists. Returns the file that was used, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&search_paths(), &cwd)
    }

    pub fn load_from(
        candidates: &[PathBuf],
        fallback_base: &Path,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            tracing::debug!("no {CONFIG_FILE} found, using defaults");
            return Ok((Self::default().resolved_against(fallback_base), None));
        };

        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config = Self::from_toml(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        let base = path.parent().unwrap_or(fallback_base);
        tracing::info!(path = %path.display(), "config loaded");
        Ok((config.resolved_against(base), Some(path.clone())))
    }

    /// The configured template if it exists, otherwise a file of the same
    /// name in the first fallback directory that has one.
    pub fn locate_template(&self, fallback_dirs: &[PathBuf]) -> PathBuf {
        if self.template_path.is_file() {
            return self.template_path.clone();
        }
        let Some(file_name) = self.template_path.file_name() else {
            return self.template_path.clone();
        };
        fallback_dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| self.template_path.clone())
    }
}

/// Working directory, then the executable's directory, then the per-user
/// config directory.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE));
    }
    if let Some(dir) = exe_dir() {
        paths.push(dir.join(CONFIG_FILE));
    }
    if let Some(dirs) = directories::ProjectDirs::from("br", "fatura", "Fatura") {
        paths.push(dirs.config_dir().join(CONFIG_FILE));
    }
    paths
}

pub fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe().ok()?.parent().map(Path::to_path_buf)
}
