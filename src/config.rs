use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::core::GenericResult;
use crate::types::Decimal;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub db_path: String,

    /// Sales VAT rate to use when none is passed on the command line
    #[serde(default = "default_vat_rate")]
    pub default_vat_rate: Decimal,
}

impl Config {
    pub fn new(config_dir: &str) -> GenericResult<Config> {
        let config_dir = shellexpand::tilde(config_dir).to_string();
        let config_path = Path::new(&config_dir).join("config.yaml");

        let mut config = match fs::read_to_string(&config_path) {
            Ok(data) => serde_yaml::from_str(&data).map_err(|e| format!(
                "Error while reading {:?} configuration file: {}", config_path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => return Err!(
                "Error while reading {:?} configuration file: {}", config_path, e),
        };

        fs::create_dir_all(&config_dir).map_err(|e| format!(
            "Unable to create {:?}: {}", config_dir, e))?;

        config.db_path = Path::new(&config_dir).join("db.sqlite")
            .to_string_lossy().into_owned();

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            db_path: String::new(),
            default_vat_rate: default_vat_rate(),
        }
    }
}

fn default_vat_rate() -> Decimal {
    dec!(0.22)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing() {
        let config: Config = serde_yaml::from_str("default_vat_rate: 0.1").unwrap();
        assert_eq!(config.default_vat_rate, dec!(0.1));

        assert!(serde_yaml::from_str::<Config>("unknown_setting: true").is_err());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.default_vat_rate, dec!(0.22));
    }
}
