// src/vendas/vendas_router.rs

use actix_web::{
    cookie::Cookie, delete, dev::Payload, get, post, web, FromRequest, HttpRequest, HttpResponse,
    HttpResponseBuilder,
};
use futures::future::{ready, Ready};
use std::sync::{PoisonError, RwLock};
use tracing::{error, info};
use uuid::Uuid;

// Importa o AppState do módulo raiz (lib.rs)
use crate::AppState;
use crate::produtos::produtos_structs::ProdutoRegistro;
use crate::shared::api_client::{decodificar, ApiError};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::autenticar;
use super::vendas_structs::{Carrinhos, NovoItemCarrinho};

/// Cookie que identifica o carrinho de um visitante sem login.
pub const COOKIE_CARRINHO: &str = "carrinho";

/// Sessão dona do carrinho: o usuário logado ou o cookie de visitante.
/// Sem nenhum dos dois, um novo id de visitante é gerado e devolvido em cookie.
#[derive(Debug, Clone)]
pub struct SessaoCarrinho {
    pub chave: String,
    novo_visitante: Option<String>,
}

impl SessaoCarrinho {
    fn identificar(req: &HttpRequest) -> Self {
        if let Ok(usuario) = autenticar(req) {
            return SessaoCarrinho { chave: format!("usuario:{}", usuario.user_id), novo_visitante: None };
        }
        if let Some(cookie) = req.cookie(COOKIE_CARRINHO) {
            return SessaoCarrinho { chave: format!("visitante:{}", cookie.value()), novo_visitante: None };
        }
        let id = Uuid::new_v4().to_string();
        SessaoCarrinho { chave: format!("visitante:{}", id), novo_visitante: Some(id) }
    }

    /// Anexa o cookie do visitante recém-criado à resposta.
    fn responder(&self, mut resposta: HttpResponseBuilder) -> HttpResponseBuilder {
        if let Some(id) = &self.novo_visitante {
            resposta.cookie(Cookie::build(COOKIE_CARRINHO, id.clone()).path("/").http_only(true).finish());
        }
        resposta
    }
}

impl FromRequest for SessaoCarrinho {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(SessaoCarrinho::identificar(req)))
    }
}

/// Rota para visualizar o conteúdo atual do carrinho.
#[get("/cart")]
pub async fn ver_carrinho(carrinhos_data: web::Data<RwLock<Carrinhos>>, sessao: SessaoCarrinho) -> HttpResponse {
    // Um lock envenenado ainda tem dados consistentes: toda mutação recalcula o total
    let carrinhos = carrinhos_data.read().unwrap_or_else(PoisonError::into_inner);

    sessao
        .responder(HttpResponse::Ok())
        .json(GenericResponse::sucesso("Conteúdo do carrinho", carrinhos.visao(&sessao.chave)))
}

/// Rota para adicionar um produto ao carrinho.
/// O produto é buscado na API para conferir preço e disponibilidade.
#[post("/cart/items")]
pub async fn adicionar_item_carrinho(
    data: web::Data<AppState>,
    carrinhos_data: web::Data<RwLock<Carrinhos>>,
    sessao: SessaoCarrinho,
    item: web::Json<NovoItemCarrinho>,
) -> HttpResponse {
    let cliente = data.clientes.para_sessao(None);

    let produto = match cliente
        .get(&format!("/product/{}", item.product_id))
        .await
        .and_then(decodificar::<ProdutoRegistro>)
    {
        Ok(produto) => produto,
        Err(ApiError::Resposta { status: 404, .. }) => {
            return HttpResponse::BadRequest().json(GenericResponse::<()>::erro(
                format!("Produto com ID {} não encontrado para adicionar ao carrinho.", item.product_id),
                None,
            ));
        }
        Err(e) => {
            error!(erro = %e, product_id = %item.product_id, "Erro ao buscar produto para o carrinho");
            return HttpResponse::BadGateway().json(GenericResponse::<()>::erro(e.mensagem_exibicao(), None));
        }
    };

    // O lock só é obtido depois da chamada à API
    let mut carrinhos = carrinhos_data.write().unwrap_or_else(PoisonError::into_inner);
    let carrinho = carrinhos.carrinho_mut(&sessao.chave);

    match carrinho.adicionar(&produto) {
        Ok(()) => {
            info!(product_id = %produto.id, total = carrinho.total(), "Item adicionado ao carrinho");
            sessao
                .responder(HttpResponse::Ok())
                .json(GenericResponse::sucesso("Item adicionado ao carrinho com sucesso!", carrinho.visao()))
        }
        Err(e) => sessao
            .responder(HttpResponse::Conflict())
            .json(GenericResponse::<()>::erro(e.to_string(), None)),
    }
}

/// Rota para remover um item do carrinho.
#[delete("/cart/items/{id}")]
pub async fn remover_item_carrinho(
    carrinhos_data: web::Data<RwLock<Carrinhos>>,
    sessao: SessaoCarrinho,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let mut carrinhos = carrinhos_data.write().unwrap_or_else(PoisonError::into_inner);

    let removido = carrinhos
        .existente_mut(&sessao.chave)
        .and_then(|carrinho| if carrinho.remover(&id) { Some(carrinho) } else { None });

    match removido {
        Some(carrinho) => {
            HttpResponse::Ok().json(GenericResponse::sucesso("Item removido do carrinho.", carrinho.visao()))
        }
        None => sessao.responder(HttpResponse::NotFound()).json(GenericResponse::<()>::erro(
            format!("Produto com ID {} não está no carrinho.", id),
            None,
        )),
    }
}
