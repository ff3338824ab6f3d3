// src/produtos/produtos_router.rs

use actix_web::{delete, get, http::header, patch, post, web, HttpResponse};
use serde_json::json;
use tracing::{error, info, warn};

// Importa as structs e componentes do módulo `produtos`
use super::formulario::{
    ConfigFormulario, FormularioProduto, Redirecionamento, ResultadoSubmissao, MENSAGEM_TIPO_AUSENTE,
};
use super::listagem::PaginaProdutos;
use super::produtos_structs::{DadosFormulario, MetodoEnvio, ProdutoRegistro};
use crate::catalogo::catalogo_router::carregar_fontes;
use crate::shared::api_client::{decodificar, ApiError, HttpClient};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AdministradorAutenticado;
use crate::AppState;

fn falha_api(contexto: &str, e: &ApiError) -> HttpResponse {
    error!(erro = %e, "{}", contexto);
    HttpResponse::BadGateway().json(GenericResponse::<()>::erro(e.mensagem_exibicao(), None))
}

async fn buscar_produtos(cliente: &dyn HttpClient) -> Result<Vec<ProdutoRegistro>, ApiError> {
    decodificar(cliente.get("/productsall").await?)
}

async fn buscar_produto(cliente: &dyn HttpClient, id: &str) -> Result<ProdutoRegistro, ApiError> {
    decodificar(cliente.get(&format!("/product/{}", id)).await?)
}

/// Converte o resultado do formulário em resposta HTTP.
fn responder(resultado: ResultadoSubmissao) -> HttpResponse {
    match resultado {
        ResultadoSubmissao::Enviado { destino } => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, destino.clone()))
            .json(GenericResponse::sucesso("Produto salvo com sucesso!", json!({ "destino": destino }))),
        ResultadoSubmissao::TipoAusente => {
            HttpResponse::BadRequest().json(GenericResponse::<()>::erro(MENSAGEM_TIPO_AUSENTE, None))
        }
        ResultadoSubmissao::Invalido(erros) => HttpResponse::UnprocessableEntity()
            .json(GenericResponse::erro("Verifique os campos do formulário.", Some(erros))),
        ResultadoSubmissao::FalhaServidor(mensagem) => {
            HttpResponse::BadGateway().json(GenericResponse::<()>::erro(mensagem, None))
        }
        ResultadoSubmissao::EmAndamento => HttpResponse::Conflict()
            .json(GenericResponse::<()>::erro("Envio já em andamento.", None)),
        ResultadoSubmissao::Delegado(produto) | ResultadoSubmissao::Validado(produto) => {
            HttpResponse::Ok().json(GenericResponse::sucesso("Produto validado", produto))
        }
    }
}

/// Monta o formulário com as opções do catálogo, seleciona o tipo enviado e submete.
/// Um segundo envio do mesmo usuário para o mesmo destino é recusado enquanto o primeiro não termina.
async fn processar_envio(
    data: &AppState,
    admin: &AdministradorAutenticado,
    mut config: ConfigFormulario,
    dados: DadosFormulario,
) -> HttpResponse {
    let Some(_envio) = data.iniciar_envio(&admin.0.user_id, &config.link_envio) else {
        warn!(user_id = %admin.0.user_id, destino = %config.link_envio, "Envio repetido recusado");
        return responder(ResultadoSubmissao::EmAndamento);
    };
    let sessao = data.clientes.para_sessao(Some(admin.0.token.as_str()));
    let cliente = sessao.as_ref();

    config.fontes = match carregar_fontes(cliente).await {
        Ok(fontes) => fontes,
        Err(e) => return falha_api("Erro ao carregar opções do formulário", &e),
    };

    let mut formulario = FormularioProduto::new(config);
    if let Some(valor) = dados.texto("productType") {
        formulario.selecionar_tipo_por_valor(&valor);
    }

    let mut navegador = Redirecionamento::default();
    let resultado = formulario.submeter(dados, cliente, &mut navegador).await;
    responder(resultado)
}

/// Rota da listagem de produtos do backoffice.
#[get("/products")]
pub async fn listar_produtos(data: web::Data<AppState>, admin: AdministradorAutenticado) -> HttpResponse {
    let cliente = data.clientes.para_sessao(Some(admin.0.token.as_str()));

    let produtos = match buscar_produtos(cliente.as_ref()).await {
        Ok(produtos) => produtos,
        Err(e) => return falha_api("Erro ao buscar produtos", &e),
    };

    HttpResponse::Ok().json(GenericResponse::sucesso("Produtos", PaginaProdutos::new(produtos).visao()))
}

/// Rota que descreve o formulário de cadastro.
#[get("/products/new")]
pub async fn formulario_cadastro(data: web::Data<AppState>, admin: AdministradorAutenticado) -> HttpResponse {
    let cliente = data.clientes.para_sessao(Some(admin.0.token.as_str()));

    let fontes = match carregar_fontes(cliente.as_ref()).await {
        Ok(fontes) => fontes,
        Err(e) => return falha_api("Erro ao carregar opções do formulário", &e),
    };

    let formulario = FormularioProduto::new(ConfigFormulario {
        link_envio: "/product".to_string(),
        metodo: Some(MetodoEnvio::Post),
        titulo: "Novo produto".to_string(),
        fontes,
        ..Default::default()
    });

    HttpResponse::Ok().json(GenericResponse::sucesso("Formulário de produto", formulario.descricao()))
}

/// Rota para cadastrar um produto a partir do formulário.
#[post("/products/new")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    admin: AdministradorAutenticado,
    dados: web::Json<DadosFormulario>,
) -> HttpResponse {
    info!(user_id = %admin.0.user_id, "Cadastro de produto");

    let config = ConfigFormulario {
        link_envio: "/product".to_string(),
        metodo: Some(MetodoEnvio::Post),
        titulo: "Novo produto".to_string(),
        ..Default::default()
    };
    processar_envio(&data, &admin, config, dados.into_inner()).await
}

/// Rota que descreve o formulário de edição, já preenchido com o produto.
#[get("/products/edit/{id}")]
pub async fn formulario_edicao(
    data: web::Data<AppState>,
    admin: AdministradorAutenticado,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let cliente = data.clientes.para_sessao(Some(admin.0.token.as_str()));

    let produto = match buscar_produto(cliente.as_ref(), &id).await {
        Ok(produto) => produto,
        Err(ApiError::Resposta { status: 404, .. }) => {
            return HttpResponse::NotFound()
                .json(GenericResponse::<()>::erro(format!("Produto {} não encontrado.", id), None));
        }
        Err(e) => return falha_api("Erro ao buscar produto", &e),
    };
    let fontes = match carregar_fontes(cliente.as_ref()).await {
        Ok(fontes) => fontes,
        Err(e) => return falha_api("Erro ao carregar opções do formulário", &e),
    };

    let formulario = FormularioProduto::new(ConfigFormulario {
        link_envio: format!("/product/{}", id),
        metodo: Some(MetodoEnvio::Patch),
        titulo: "Editar produto".to_string(),
        dados_iniciais: Some(produto),
        fontes,
        ..Default::default()
    });

    HttpResponse::Ok().json(GenericResponse::sucesso("Formulário de produto", formulario.descricao()))
}

/// Rota para atualizar um produto existente.
#[patch("/products/edit/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    admin: AdministradorAutenticado,
    path: web::Path<String>,
    dados: web::Json<DadosFormulario>,
) -> HttpResponse {
    let id = path.into_inner();
    info!(user_id = %admin.0.user_id, product_id = %id, "Edição de produto");

    let config = ConfigFormulario {
        link_envio: format!("/product/{}", id),
        metodo: Some(MetodoEnvio::Patch),
        titulo: "Editar produto".to_string(),
        ..Default::default()
    };
    processar_envio(&data, &admin, config, dados.into_inner()).await
}

/// Rota para excluir um produto (após a confirmação no modal).
/// Responde com a página já sem a linha excluída, ou com o modal aberto e o erro.
#[delete("/products/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    admin: AdministradorAutenticado,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let cliente = data.clientes.para_sessao(Some(admin.0.token.as_str()));

    let mut pagina = match buscar_produtos(cliente.as_ref()).await {
        Ok(produtos) => PaginaProdutos::new(produtos),
        Err(e) => return falha_api("Erro ao buscar produtos", &e),
    };

    let Some(linha) = pagina.produtos().iter().position(|p| p.id == id) else {
        return HttpResponse::NotFound()
            .json(GenericResponse::<()>::erro(format!("Produto {} não encontrado.", id), None));
    };

    pagina.abrir_modal(&id, linha);
    if pagina.confirmar_exclusao(cliente.as_ref()).await {
        info!(user_id = %admin.0.user_id, product_id = %id, "Produto excluído");
        HttpResponse::Ok().json(GenericResponse::sucesso("Produto excluído com sucesso!", pagina.visao()))
    } else {
        let mensagem = pagina.modal().erro.clone().unwrap_or_default();
        HttpResponse::BadGateway().json(GenericResponse::erro(mensagem, Some(pagina.visao())))
    }
}
