use primview_scene::ShapeKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or saving a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format {0:?}, expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Startup settings for a viewer host. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial logical window width.
    pub width: u32,
    /// Initial logical window height.
    pub height: u32,
    pub shape: ShapeKind,
    pub damping_factor: f32,
    pub msaa_samples: u32,
    pub show_panel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "primview".into(),
            width: 1280,
            height: 720,
            shape: ShapeKind::Cube,
            damping_factor: 0.05,
            msaa_samples: 4,
            show_panel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn for_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl ViewerConfig {
    /// Load from a YAML or JSON file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::for_path(path)?;
        let data = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Yaml => serde_yaml::from_str(&data)?,
            Format::Json => serde_json::from_str(&data)?,
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let data = match Format::for_path(path)? {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.msaa_samples == 0 {
            return Err(ConfigError::Invalid("msaa_samples must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.shape, ShapeKind::Cube);
        assert_eq!(config.damping_factor, 0.05);
        assert_eq!(config.msaa_samples, 4);
        assert!(config.show_panel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_partial_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("viewer.yaml");
        std::fs::write(&path, "shape: knot\nwidth: 800\nshow_panel: false\n").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.shape, ShapeKind::Knot);
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 720);
        assert!(!config.show_panel);
    }

    #[test]
    fn save_and_load_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("viewer.json");
        let config = ViewerConfig {
            title: "knots".into(),
            shape: ShapeKind::Sphere,
            msaa_samples: 1,
            ..ViewerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn rejects_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("viewer.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            ViewerConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("viewer.yml");
        std::fs::write(&path, "damping_factor: 0.0\n").unwrap();
        assert!(matches!(ViewerConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("viewer.yaml");
        std::fs::write(&path, "shape: teapot\n").unwrap();
        assert!(matches!(ViewerConfig::load(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.json");
        assert!(matches!(ViewerConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
