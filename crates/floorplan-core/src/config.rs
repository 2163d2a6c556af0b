//! Library configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::name::is_hidden;

/// Document type managed inside each building.
pub const DEFAULT_DOCUMENT_EXTENSION: &str = "pdf";

/// Directory created under the platform documents directory.
pub const DEFAULT_ROOT_NAME: &str = "Floorplans";

/// Configuration for a floorplan library.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct LibraryConfig {
    /// Storage root. Direct children are buildings.
    #[builder(default = "default_root()")]
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Extension (without the dot) of managed documents.
    #[builder(default = "DEFAULT_DOCUMENT_EXTENSION.to_string()")]
    #[serde(default = "default_extension")]
    pub document_extension: String,

    /// List hidden entries (starting with .).
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,

    /// Move deleted entries to the OS trash instead of removing them.
    #[builder(default = "false")]
    #[serde(default)]
    pub use_trash: bool,
}

fn default_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_ROOT_NAME)
}

fn default_extension() -> String {
    DEFAULT_DOCUMENT_EXTENSION.to_string()
}

impl LibraryConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        }
        if let Some(ref ext) = self.document_extension {
            if ext.is_empty() {
                return Err("Document extension cannot be empty".to_string());
            }
            if ext.starts_with('.') {
                return Err("Document extension must not start with a dot".to_string());
            }
        }
        Ok(())
    }
}

impl LibraryConfig {
    /// Create a new config builder.
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }

    /// Create a config rooted at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            document_extension: default_extension(),
            include_hidden: false,
            use_trash: false,
        }
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("floorplan").join("config.toml"))
    }

    /// Load a config from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        toml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Save the config as TOML, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, path: &Path) -> bool {
        !self.include_hidden && is_hidden(path)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(default_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LibraryConfig::builder()
            .root("/srv/plans")
            .document_extension("dwg")
            .use_trash(true)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/plans"));
        assert_eq!(config.document_extension, "dwg");
        assert!(config.use_trash);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_builder_rejects_dotted_extension() {
        let result = LibraryConfig::builder()
            .root("/srv/plans")
            .document_extension(".pdf")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_root_name() {
        let config = LibraryConfig::default();
        assert!(config.root.ends_with(DEFAULT_ROOT_NAME));
        assert_eq!(config.document_extension, "pdf");
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = LibraryConfig::new("/srv/plans");
        assert!(config.should_skip_hidden(Path::new("/srv/plans/.Trash")));
        assert!(!config.should_skip_hidden(Path::new("/srv/plans/Tower A")));

        config.include_hidden = true;
        assert!(!config.should_skip_hidden(Path::new("/srv/plans/.Trash")));
    }
}
