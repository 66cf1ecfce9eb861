//! Handles settings for the command line tool. Configuration is read from
//! `settle_up.toml` (if present) and `SETTLE_UP_*` environment variables,
//! e.g. `SETTLE_UP_APP__LEVEL=debug`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Display {
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub display: Display,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("settle_up").required(false),
        };

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("display.currency", "")?
            .add_source(file)
            .add_source(Environment::with_prefix("SETTLE_UP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
