use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use explorer_filter::{CountryOption, TestNameOption};
use explorer_log::LogConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The basename of the configuration file within the config directory.
const CONFIG_FILE: &str = "config.yml";

/// Indicates config related errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigErrorKind {
    /// Failed to open the file.
    #[error("could not open config file")]
    CouldNotOpenFile,
    /// Parsing YAML failed.
    #[error("could not parse yaml config file")]
    BadYaml,
    /// Parsing JSON failed.
    #[error("could not parse json catalog file")]
    BadJson,
}

/// An error loading the configuration or one of the catalogs it refers to.
#[derive(Debug)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    path: PathBuf,
    source: Box<dyn Error + Send + Sync + 'static>,
}

impl ConfigError {
    fn wrap<E>(source: E, kind: ConfigErrorKind, path: &Path) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            kind,
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }

    /// Returns the error kind of the error.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the file that caused the error.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (file {})", self.kind, self.path.display())
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

fn open(path: &Path) -> Result<io::BufReader<fs::File>, ConfigError> {
    fs::File::open(path)
        .map(io::BufReader::new)
        .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotOpenFile, path))
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    serde_yaml::from_reader(open(path)?)
        .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadYaml, path))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    serde_json::from_reader(open(path)?)
        .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadJson, path))
}

/// Locations of the catalog files.
///
/// Both catalogs are JSON arrays. Relative paths are resolved against the config directory.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogsConfig {
    /// Test names as `[{"id": "...", "name": "..."}]`.
    pub test_names: Option<PathBuf>,
    /// Countries as `[{"alpha_2": "...", "name": "..."}]`.
    pub countries: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct ConfigValues {
    logging: LogConfig,
    catalogs: CatalogsConfig,
}

/// Config struct.
#[derive(Debug, Default)]
pub struct Config {
    values: ConfigValues,
    path: PathBuf,
}

impl Config {
    /// Loads the config from the `config.yml` file in the given directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let values = load_yaml(&path.join(CONFIG_FILE))?;
        Ok(Config { values, path })
    }

    /// Returns the directory the config was loaded from.
    ///
    /// This is empty for the default config.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the logging configuration.
    pub fn logging(&self) -> &LogConfig {
        &self.values.logging
    }

    /// Returns the catalog locations.
    pub fn catalogs(&self) -> &CatalogsConfig {
        &self.values.catalogs
    }

    /// Loads the test name catalog.
    ///
    /// Returns an empty catalog if none is configured.
    pub fn test_names(&self) -> Result<Vec<TestNameOption>, ConfigError> {
        match self.values.catalogs.test_names {
            Some(ref path) => load_json(&self.path.join(path)),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the country catalog.
    ///
    /// Returns an empty catalog if none is configured.
    pub fn countries(&self) -> Result<Vec<CountryOption>, ConfigError> {
        match self.values.catalogs.countries {
            Some(ref path) => load_json(&self.path.join(path)),
            None => Ok(Vec::new()),
        }
    }
}
