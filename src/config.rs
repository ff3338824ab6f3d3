// src/config.rs

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("variável de ambiente {0} não definida")]
    Ausente(&'static str),
    #[error("valor inválido para {variavel}: {valor}")]
    Invalida { variavel: &'static str, valor: String },
}

/// Configuração da aplicação, lida do ambiente (e de um `.env`, se existir).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub api_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|chave| std::env::var(chave).ok())
    }

    /// Monta a configuração a partir de uma função de busca (ambiente ou mapa em testes).
    pub fn from_lookup(buscar: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = buscar("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Ausente("JWT_SECRET"))?;

        let api_timeout = match buscar("API_TIMEOUT_SECS") {
            Some(valor) => valor
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalida { variavel: "API_TIMEOUT_SECS", valor })?,
            None => Duration::from_secs(30),
        };

        Ok(Config {
            api_url: buscar("DUNNA_API_URL").unwrap_or_else(|| "http://localhost:3333".to_string()),
            jwt_secret,
            bind_addr: buscar("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_timeout,
        })
    }
}
