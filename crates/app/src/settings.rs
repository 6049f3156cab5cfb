//! Application settings, read from `settings.toml` (or the file passed with
//! `--config`) and overridden by `GASTOS__SECTION__KEY` environment variables.
//!
//! See `settings.example.toml` for the full layout.
use clap::Parser;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Debug, Parser)]
#[command(name = "gastosmensais", version)]
struct Args {
    /// Config file path (TOML). Missing files are ignored.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

impl Mail {
    pub fn smtp(&self) -> engine::SmtpConfig {
        engine::SmtpConfig {
            host: self.host.clone(),
            port: self.port.unwrap_or(engine::DEFAULT_SMTP_PORT),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub mail: Option<Mail>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let builder = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix("GASTOS")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::with_defaults(builder)
    }

    fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.database", "memory")?
            .build()?
            .try_deserialize()
    }
}
