use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};
use crate::storage::locate_database;
use crate::ui::TableStyle;

/// Directory every benchmark root must contain
pub const DATABASE_DIR: &str = "bigclonebenchdb";

/// Database locator relative to the project root (extension optional)
pub const DEFAULT_DATABASE: &str = "bigclonebenchdb/BigCloneBench_BCEvalVersion/bcb";

/// Corpus root relative to the project root
pub const DEFAULT_CORPUS: &str = "ijadataset/dataset";

/// Optional settings from `clonelookup.toml`. Command-line flags win.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LookupConfig {
    pub path: Option<String>,
    pub database: Option<String>,
    pub corpus: Option<String>,
    pub style: Option<TableStyle>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("clonelookup.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<LookupConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: LookupConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Where the database and corpus live for one benchmark checkout
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub database: PathBuf,
    pub corpus: PathBuf,
}

impl ProjectLayout {
    /// Validate the project root and locate the database file.
    ///
    /// `database` and `corpus` are relative to `root` unless absolute. The
    /// corpus is not checked here; a missing corpus only affects extraction.
    pub fn resolve(root: &Path, database: Option<&Path>, corpus: Option<&Path>) -> Result<Self> {
        if !root.join(DATABASE_DIR).is_dir() {
            return Err(Error::InvalidProjectRoot(root.to_path_buf()));
        }

        let locator = root.join(database.unwrap_or(Path::new(DEFAULT_DATABASE)));
        let database = locate_database(&locator).ok_or(Error::DatabaseNotFound(locator))?;
        let corpus = root.join(corpus.unwrap_or(Path::new(DEFAULT_CORPUS)));

        Ok(Self {
            root: root.to_path_buf(),
            database,
            corpus,
        })
    }
}
