// src/lib.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::web;

pub mod catalogo;   // Módulo do catálogo (pedras, formatos, tipos, metais)
pub mod config;     // Configuração por variáveis de ambiente
pub mod produtos;   // Módulo de produtos (formulário e listagem)
pub mod shared;     // Módulo shared
pub mod usuarios;   // Módulo de usuários
pub mod vendas;     // Módulo do carrinho

use shared::api_client::FabricaClientes;

// Estado compartilhado: fábrica de clientes da API, a chave secreta JWT
// e os envios de formulário em andamento, por (usuário, destino).
pub struct AppState {
    pub clientes: Arc<dyn FabricaClientes>,
    pub jwt_secret: String,
    pub envios_em_andamento: Mutex<HashSet<(String, String)>>,
}

impl AppState {
    pub fn new(clientes: Arc<dyn FabricaClientes>, jwt_secret: String) -> Self {
        AppState { clientes, jwt_secret, envios_em_andamento: Mutex::new(HashSet::new()) }
    }

    /// Registra o envio; devolve `None` se o mesmo envio já está em andamento.
    /// O registro é desfeito quando a guarda sai de escopo.
    pub fn iniciar_envio(&self, usuario: &str, destino: &str) -> Option<EnvioEmAndamento<'_>> {
        let chave = (usuario.to_string(), destino.to_string());
        let mut envios = self.envios_em_andamento.lock().unwrap_or_else(PoisonError::into_inner);
        if !envios.insert(chave.clone()) {
            return None;
        }
        Some(EnvioEmAndamento { envios: &self.envios_em_andamento, chave })
    }
}

pub struct EnvioEmAndamento<'a> {
    envios: &'a Mutex<HashSet<(String, String)>>,
    chave: (String, String),
}

impl Drop for EnvioEmAndamento<'_> {
    fn drop(&mut self) {
        self.envios.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.chave);
    }
}

/// Registra todas as rotas da aplicação.
pub fn configurar_rotas(cfg: &mut web::ServiceConfig) {
    cfg
        // Módulo de Produtos (backoffice)
        .service(produtos::produtos_router::listar_produtos)
        .service(produtos::produtos_router::formulario_cadastro)
        .service(produtos::produtos_router::cadastrar_produto)
        .service(produtos::produtos_router::formulario_edicao)
        .service(produtos::produtos_router::atualizar_produto)
        .service(produtos::produtos_router::deletar_produto)

        // Módulo do Catálogo
        .service(catalogo::catalogo_router::buscar_opcoes)

        // Módulo do Carrinho
        .service(vendas::vendas_router::ver_carrinho)
        .service(vendas::vendas_router::adicionar_item_carrinho)
        .service(vendas::vendas_router::remover_item_carrinho)

        // Módulo de Usuários
        .service(usuarios::usuario_router::usuario_atual);
}
