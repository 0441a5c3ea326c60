// utils/config.rs
use crate::infrastructure::error::{AppError, AppResult};
use crate::utils::helpers::parse_flag;
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    // Environnement et serveur
    #[validate(length(min = 1))]
    pub run_mode: String,
    #[validate(length(min = 1))]
    pub server_host: String,
    #[validate(range(min = 1))]
    pub server_port: u16,
    #[validate(range(min = 1, max = 256))]
    pub workers: usize,

    // Logging
    pub log_level: String,
    pub logging_format: String,

    // Modèles
    #[validate(length(min = 1))]
    pub model_dir: String,

    // CORS
    pub cors_max_age: usize,

    // Feature flags
    pub enable_model_catalog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: "development".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            workers: 4,
            log_level: "info".to_string(),
            logging_format: "json".to_string(),
            model_dir: "./models".to_string(),
            cors_max_age: 3600,
            enable_model_catalog: true,
        }
    }
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> AppResult<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construire la configuration à partir d'une source clé/valeur quelconque
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            run_mode: lookup("RUN_MODE").unwrap_or(defaults.run_mode),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            workers: parse_var(&lookup, "WORKERS", defaults.workers)?,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            logging_format: lookup("LOGGING_FORMAT").unwrap_or(defaults.logging_format),
            model_dir: lookup("MODEL_DIR").unwrap_or(defaults.model_dir),
            cors_max_age: parse_var(&lookup, "CORS_MAX_AGE", defaults.cors_max_age)?,
            enable_model_catalog: match lookup("ENABLE_MODEL_CATALOG") {
                Some(raw) => parse_flag(&raw).ok_or_else(|| {
                    AppError::ConfigurationError("ENABLE_MODEL_CATALOG must be a boolean".to_string())
                })?,
                None => defaults.enable_model_catalog,
            },
        };

        config
            .validate()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        Ok(config)
    }

    /// Répertoire des artefacts de modèles
    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.model_dir)
    }

    /// Adresse d'écoute du serveur
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.run_mode == "production"
    }

    /// Vérifier si les logs doivent être émis en JSON
    pub fn json_logs(&self) -> bool {
        self.logging_format == "json"
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigurationError(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.workers, 4);
        assert_eq!(config.model_dir, "./models");
        assert!(config.enable_model_catalog);
        assert!(config.json_logs());
        assert!(!config.is_production());
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("RUN_MODE", "production"),
            ("SERVER_PORT", "9000"),
            ("MODEL_DIR", "/srv/models"),
            ("LOGGING_FORMAT", "pretty"),
            ("ENABLE_MODEL_CATALOG", "off"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.model_path(), PathBuf::from("/srv/models"));
        assert!(!config.json_logs());
        assert!(!config.enable_model_catalog);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_PORT", "abc")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));

        let err = Config::from_lookup(lookup_from(&[("WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));

        let err = Config::from_lookup(lookup_from(&[("MODEL_DIR", "")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));

        let err = Config::from_lookup(lookup_from(&[("ENABLE_MODEL_CATALOG", "bof")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }
}
