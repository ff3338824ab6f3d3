// src/main.rs

use std::sync::{Arc, RwLock};

use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dunna::config::Config;
use dunna::shared::api_client::ClientesApi;
use dunna::vendas::vendas_structs::Carrinhos;
use dunna::{configurar_rotas, AppState};

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG controla o nível dos logs (padrão: info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| {
        error!(erro = %e, "Configuração inválida");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let clientes = ClientesApi::new(&config.api_url, config.api_timeout).map_err(|e| {
        error!(erro = %e, "Falha ao criar o cliente da API");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // web::Data é usado para compartilhar dados imutáveis entre as rotas.
    let app_state = web::Data::new(AppState::new(Arc::new(clientes), config.jwt_secret.clone()));

    // Carrinhos em memória por sessão; RwLock permite múltiplos leitores ou um único escritor.
    let carrinho_state = web::Data::new(RwLock::new(Carrinhos::default()));

    info!(api = %config.api_url, bind = %config.bind_addr, "Iniciando Dunna backoffice");

    HttpServer::new(move || {
        App::new()
            // .clone() é necessário porque a closure é executada por worker
            .app_data(app_state.clone())
            .app_data(carrinho_state.clone())
            .configure(configurar_rotas)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
