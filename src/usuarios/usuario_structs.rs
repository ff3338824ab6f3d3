// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};

/// Estrutura para o payload do JWT (Claims).
/// Contém informações sobre o usuário e a expiração do token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (ID do usuário na API)
    pub name: String,  // Nome do usuário
    pub email: String, // Email do usuário
    #[serde(default)]
    pub admin: bool,   // Acesso ao backoffice
    pub exp: i64,      // Expiration Time (timestamp Unix)
}

/// Usuário da sessão atual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsuarioSessao {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub admin: bool,
}

/// Contexto do usuário compartilhado pelas páginas.
/// Toda alteração passa pelas operações nomeadas abaixo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextoUsuario {
    usuario: Option<UsuarioSessao>,
}

impl ContextoUsuario {
    pub fn usuario(&self) -> Option<&UsuarioSessao> {
        self.usuario.as_ref()
    }

    pub fn definir_usuario(&mut self, usuario: UsuarioSessao) {
        self.usuario = Some(usuario);
    }

    pub fn limpar(&mut self) {
        self.usuario = None;
    }

    pub fn autenticado(&self) -> bool {
        self.usuario.is_some()
    }

    pub fn administrador(&self) -> bool {
        self.usuario.as_ref().map_or(false, |u| u.admin)
    }
}
