// src/catalogo/catalogo_router.rs

use actix_web::{get, web, HttpResponse};
use tracing::error;

use super::catalogo_structs::{EntidadeCatalogo, FontesOpcoes, OpcoesFormulario};
use crate::shared::api_client::{decodificar, ApiError, HttpClient};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Busca uma lista de entidades do catálogo na API.
async fn buscar_lista(cliente: &dyn HttpClient, url: &str) -> Result<Vec<EntidadeCatalogo>, ApiError> {
    decodificar(cliente.get(url).await?)
}

/// Carrega as quatro listas de origem do formulário de produto.
/// As requisições são feitas em sequência; a primeira falha interrompe o carregamento.
pub async fn carregar_fontes(cliente: &dyn HttpClient) -> Result<FontesOpcoes, ApiError> {
    Ok(FontesOpcoes {
        stones: buscar_lista(cliente, "/stones").await?,
        shapes: buscar_lista(cliente, "/shapes").await?,
        types: buscar_lista(cliente, "/types").await?,
        metals: buscar_lista(cliente, "/metals").await?,
    })
}

/// Rota para listar as opções (pedras, formatos, tipos e metais) já normalizadas.
#[get("/catalog/options")]
pub async fn buscar_opcoes(data: web::Data<AppState>) -> HttpResponse {
    let cliente = data.clientes.para_sessao(None);

    match carregar_fontes(cliente.as_ref()).await {
        Ok(fontes) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Opções do catálogo",
            OpcoesFormulario::from(&fontes),
        )),
        Err(e) => {
            error!(erro = %e, "Erro ao carregar opções do catálogo");
            HttpResponse::BadGateway().json(GenericResponse::<()>::erro(e.mensagem_exibicao(), None))
        }
    }
}
