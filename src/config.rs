use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a file's date comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Only dates embedded in the file name; files without one are unsorted.
    #[default]
    Filename,
    /// Only the platform reference timestamp (creation or modification time).
    Timestamp,
    /// Name-embedded date first, reference timestamp when the name has none.
    FilenameOrTimestamp,
}

impl DateSource {
    pub fn uses_filename(self) -> bool {
        matches!(self, Self::Filename | Self::FilenameOrTimestamp)
    }

    pub fn uses_timestamp(self) -> bool {
        matches!(self, Self::Timestamp | Self::FilenameOrTimestamp)
    }
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Filename => "filename",
            Self::Timestamp => "timestamp",
            Self::FilenameOrTimestamp => "filename_or_timestamp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Flat pool of files waiting to be sorted.
    pub input_dir: PathBuf,
    /// Root under which the `YYYY/YYYY_MM/YYYY_MM_DD` tree is built.
    pub output_root: PathBuf,
    /// Holding area for everything that could not be classified.
    pub unsorted_dir: PathBuf,
    pub date_source: DateSource,
    /// Ask before every renumbered name when a collision occurs.
    pub interactive: bool,
    /// Stop the sweep at the first declined rename.
    pub abort_on_decline: bool,
    /// Glob patterns matched against entry names; matches stay in the pool.
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./MEDIRO_requires_sorting"),
            output_root: PathBuf::from("."),
            unsorted_dir: PathBuf::from("./MEDIRO_unsorted"),
            date_source: DateSource::default(),
            interactive: false,
            abort_on_decline: false,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Load `Config.toml` (optional) from the working directory, then overlay
/// `MEDIRO_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("MEDIRO")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
