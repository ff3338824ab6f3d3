// src/usuarios/usuario_router.rs

use actix_web::{get, HttpResponse};

use super::auth_middleware::UsuarioAutenticado;
use super::usuario_structs::ContextoUsuario;
use crate::shared::shared_structs::GenericResponse;

/// Rota que devolve o contexto do usuário da sessão.
#[get("/me")]
pub async fn usuario_atual(usuario: UsuarioAutenticado) -> HttpResponse {
    let mut contexto = ContextoUsuario::default();
    contexto.definir_usuario(usuario.sessao());

    HttpResponse::Ok().json(GenericResponse::sucesso("Usuário da sessão", contexto))
}
