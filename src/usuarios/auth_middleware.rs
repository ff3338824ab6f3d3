// src/usuarios/auth_middleware.rs

use actix_web::{
    dev::Payload,
    error::{ErrorForbidden, ErrorUnauthorized},
    http::header,
    FromRequest, HttpRequest, web
};

use futures::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{error, warn};

// Importa as Claims do módulo de structs de usuário
use super::usuario_structs::{Claims, UsuarioSessao};
// Importa o AppState do módulo raiz (lib.rs)
use crate::AppState;

/// Nome do cookie que carrega o token da sessão.
pub const COOKIE_TOKEN: &str = "token";

/// Struct que representa o usuário autenticado, contendo as claims do JWT.
/// O token original é mantido para ser repassado à API.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub admin: bool,
    pub token: String,
}

impl UsuarioAutenticado {
    pub fn sessao(&self) -> UsuarioSessao {
        UsuarioSessao {
            id: self.user_id.clone(),
            nome: self.user_name.clone(),
            email: self.user_email.clone(),
            admin: self.admin,
        }
    }
}

/// Usuário autenticado com acesso ao backoffice.
#[derive(Debug, Clone)]
pub struct AdministradorAutenticado(pub UsuarioAutenticado);

/// Lê o token do cookie `token` ou do cabeçalho `Authorization: Bearer <token>`.
fn extrair_token(req: &HttpRequest) -> Result<String, &'static str> {
    if let Some(cookie) = req.cookie(COOKIE_TOKEN) {
        return Ok(cookie.value().to_string());
    }

    match req.headers().get(header::AUTHORIZATION) {
        Some(header_value) => {
            let header_str = header_value.to_str().map_err(|_| "Token de autenticação inválido.")?;
            // Verifica se o cabeçalho começa com "Bearer "
            header_str
                .strip_prefix("Bearer ")
                .map(str::to_string)
                .ok_or("Formato de token inválido. Esperado 'Bearer <token>'.")
        }
        None => Err("Token de autenticação ausente."),
    }
}

/// Valida o token da requisição e monta o usuário.
pub(crate) fn autenticar(req: &HttpRequest) -> Result<UsuarioAutenticado, actix_web::Error> {
    // Acessa o AppState para obter a chave secreta JWT
    let jwt_secret = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.jwt_secret.clone(),
        None => {
            error!("AppState não disponível no extrator de autenticação");
            return Err(ErrorUnauthorized("Erro de configuração do servidor."));
        }
    };

    let token = extrair_token(req).map_err(ErrorUnauthorized)?;

    // validate_exp já é true por padrão
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map_err(|e| {
        warn!(erro = ?e, "Token de sessão recusado");
        let error_message = match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
            jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
            _ => "Token de autenticação inválido.",
        };
        ErrorUnauthorized(error_message)
    })?;

    Ok(UsuarioAutenticado {
        user_id: token_data.claims.sub,
        user_name: token_data.claims.name,
        user_email: token_data.claims.email,
        admin: token_data.claims.admin,
        token,
    })
}

/// Extrator de autenticação para Actix Web.
impl FromRequest for UsuarioAutenticado {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(autenticar(req))
    }
}

/// Exige, além do token válido, a permissão de administrador.
impl FromRequest for AdministradorAutenticado {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resultado = autenticar(req).and_then(|usuario| {
            if usuario.admin {
                Ok(AdministradorAutenticado(usuario))
            } else {
                warn!(user_id = %usuario.user_id, "Acesso ao backoffice negado");
                Err(ErrorForbidden("Acesso restrito a administradores."))
            }
        });
        ready(resultado)
    }
}
