use crate::core::scheduler::DEFAULT_TICK_INTERVAL;
use crate::errors::{AppError, AppResult};
use crate::models::{BreakCategory, WorkLocation};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_position")]
    pub default_position: String,
    #[serde(default = "default_break")]
    pub default_break: String,
    /// Period of the live snapshot refresh used by `watch`.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// After check-out, the state goes back to "not checked in" on its own
    /// once this many seconds have passed (an explicit `reset` is immediate).
    #[serde(default = "default_reset_delay_seconds")]
    pub reset_delay_seconds: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_position() -> String {
    "O".to_string()
}
fn default_break() -> String {
    "lunch".to_string()
}
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}
fn default_reset_delay_seconds() -> i64 {
    300
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_position: default_position(),
            default_break: default_break(),
            tick_interval_ms: default_tick_interval_ms(),
            reset_delay_seconds: default_reset_delay_seconds(),
            log_level: default_log_level(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattendance")
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn default_location(&self) -> AppResult<WorkLocation> {
        WorkLocation::from_code(&self.default_position).ok_or_else(|| {
            AppError::Config(format!(
                "default_position '{}' is not a valid location code",
                self.default_position
            ))
        })
    }

    pub fn default_break_category(&self) -> AppResult<BreakCategory> {
        BreakCategory::parse(&self.default_break).ok_or_else(|| {
            AppError::Config(format!(
                "default_break '{}' is not a valid break kind",
                self.default_break
            ))
        })
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn reset_delay(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reset_delay_seconds.max(0))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = std::path::Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("rattendance.sqlite"),
        };

        let config = Config::with_database(db_path);

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(config)
    }

    /// Make sure the directory of the database file exists.
    pub fn ensure_database_dir(&self) -> io::Result<()> {
        if let Some(parent) = PathBuf::from(&self.database).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
