// src/shared/shared_structs.rs

use serde::Serialize;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Debug, Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Resposta de sucesso com corpo.
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }

    /// Resposta de erro; o corpo é opcional (ex.: mapa de erros de validação).
    pub fn erro(message: impl Into<String>, body: Option<T>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body,
        }
    }
}

impl GenericResponse<()> {
    /// Resposta sem corpo.
    pub fn mensagem(status: &str, message: impl Into<String>) -> Self {
        GenericResponse {
            status: status.to_string(),
            message: message.into(),
            body: None,
        }
    }
}
