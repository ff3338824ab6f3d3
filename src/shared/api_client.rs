// src/shared/api_client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Mensagem exibida quando a falha não traz um campo `error` legível.
pub const MENSAGEM_ERRO_GENERICO: &str = "Não foi possível concluir a operação. Tente novamente.";

/// Erros de comunicação com a API do catálogo.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("erro de rede: {0}")]
    Transporte(String),
    #[error("tempo esgotado")]
    TempoEsgotado,
    #[error("http {status}: {}", .erro.as_deref().unwrap_or("sem mensagem"))]
    Resposta { status: u16, erro: Option<String> },
    #[error("resposta inválida: {0}")]
    Decodificacao(String),
}

impl ApiError {
    /// Mensagem que pode ser mostrada ao usuário.
    ///
    /// Apenas respostas com `{ "error": "..." }` carregam a mensagem do servidor;
    /// qualquer outra falha usa [`MENSAGEM_ERRO_GENERICO`].
    pub fn mensagem_exibicao(&self) -> String {
        match self {
            ApiError::Resposta { erro: Some(mensagem), .. } => mensagem.clone(),
            _ => MENSAGEM_ERRO_GENERICO.to_string(),
        }
    }
}

/// Corpo de erro padrão devolvido pela API.
#[derive(Deserialize)]
struct CorpoErro {
    error: String,
}

/// Contrato do cliente HTTP consumido pelos formulários e páginas.
/// Cada operação devolve o corpo JSON decodificado (ou `Null` quando vazio).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<Value, ApiError>;
    async fn post(&self, url: &str, corpo: &Value) -> Result<Value, ApiError>;
    async fn patch(&self, url: &str, corpo: &Value) -> Result<Value, ApiError>;
    async fn delete(&self, url: &str) -> Result<Value, ApiError>;
}

/// Cria clientes ligados à sessão do usuário (token repassado como cookie).
pub trait FabricaClientes: Send + Sync {
    fn para_sessao(&self, token: Option<&str>) -> Box<dyn HttpClient>;
}

/// Fábrica real, baseada em `reqwest`.
#[derive(Debug, Clone)]
pub struct ClientesApi {
    http: Client,
    base_url: String,
}

impl ClientesApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transporte(e.to_string()))?;

        Ok(ClientesApi {
            http,
            // Remove a barra final para concatenar com caminhos que começam com '/'
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl FabricaClientes for ClientesApi {
    fn para_sessao(&self, token: Option<&str>) -> Box<dyn HttpClient> {
        Box::new(ClienteApi {
            http: self.http.clone(), // O Client do reqwest é um Arc internamente
            base_url: self.base_url.clone(),
            token: token.map(str::to_string),
        })
    }
}

/// Cliente de uma sessão.
#[derive(Debug, Clone)]
pub struct ClienteApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ClienteApi {
    async fn enviar(&self, metodo: Method, url: &str, corpo: Option<&Value>) -> Result<Value, ApiError> {
        let mut requisicao = self.http.request(metodo.clone(), format!("{}{}", self.base_url, url));

        if let Some(token) = &self.token {
            requisicao = requisicao.header(header::COOKIE, format!("token={};", token));
        }
        if let Some(corpo) = corpo {
            requisicao = requisicao.json(corpo);
        }

        let resposta = requisicao.send().await.map_err(mapear_erro_reqwest)?;
        let status = resposta.status();
        let bytes = resposta.bytes().await.map_err(mapear_erro_reqwest)?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| ApiError::Decodificacao(e.to_string()));
        }

        let erro = serde_json::from_slice::<CorpoErro>(&bytes).ok().map(|c| c.error);
        warn!(%metodo, url, status = status.as_u16(), "API respondeu com erro");
        Err(ApiError::Resposta { status: status.as_u16(), erro })
    }
}

#[async_trait]
impl HttpClient for ClienteApi {
    async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.enviar(Method::GET, url, None).await
    }

    async fn post(&self, url: &str, corpo: &Value) -> Result<Value, ApiError> {
        self.enviar(Method::POST, url, Some(corpo)).await
    }

    async fn patch(&self, url: &str, corpo: &Value) -> Result<Value, ApiError> {
        self.enviar(Method::PATCH, url, Some(corpo)).await
    }

    async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        self.enviar(Method::DELETE, url, None).await
    }
}

fn mapear_erro_reqwest(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::TempoEsgotado
    } else {
        ApiError::Transporte(e.to_string())
    }
}

/// Decodifica o corpo JSON de uma resposta em um tipo concreto.
pub fn decodificar<T: serde::de::DeserializeOwned>(valor: Value) -> Result<T, ApiError> {
    serde_json::from_value(valor).map_err(|e| ApiError::Decodificacao(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Servidor de uma conexão só: responde `resposta` e devolve a requisição recebida.
    fn servidor(resposta: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endereco = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buffer = [0u8; 8192];
                let lidos = stream.read(&mut buffer).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buffer[..lidos]).to_string());
                let _ = stream.write_all(resposta.as_bytes());
            }
        });
        (format!("http://{}", endereco), rx)
    }

    fn cliente(base_url: &str, token: Option<&str>) -> Box<dyn HttpClient> {
        ClientesApi::new(base_url, Duration::from_secs(5)).unwrap().para_sessao(token)
    }

    #[actix_web::test]
    async fn erro_json_traz_mensagem_do_servidor() {
        let corpo = r#"{"error":"Estoque duplicado"}"#;
        let (url, requisicao) = servidor(format!(
            "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            corpo.len(),
            corpo
        ));

        let erro = cliente(&url, Some("abc")).get("/product").await.unwrap_err();

        assert_eq!(erro, ApiError::Resposta { status: 400, erro: Some("Estoque duplicado".to_string()) });
        assert_eq!(erro.mensagem_exibicao(), "Estoque duplicado");
        let recebida = requisicao.recv().unwrap().to_lowercase();
        assert!(recebida.starts_with("get /product "));
        assert!(recebida.contains("cookie: token=abc;"));
    }

    #[actix_web::test]
    async fn erro_sem_json_usa_mensagem_generica() {
        let (url, _requisicao) = servidor(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/html\r\nContent-Length: 15\r\nConnection: close\r\n\r\n<h1>Erro!</h1>\n"
                .to_string(),
        );

        let erro = cliente(&url, None).post("/product", &serde_json::json!({ "name": "Anel" })).await.unwrap_err();

        assert_eq!(erro, ApiError::Resposta { status: 500, erro: None });
        assert_eq!(erro.mensagem_exibicao(), MENSAGEM_ERRO_GENERICO);
    }

    #[actix_web::test]
    async fn sucesso_sem_corpo_vira_null() {
        let (url, _requisicao) = servidor("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string());

        let valor = cliente(&url, None).delete("/product/a1").await.unwrap();

        assert_eq!(valor, Value::Null);
    }

    #[test]
    fn mensagem_do_servidor_tem_prioridade() {
        let erro = ApiError::Resposta { status: 409, erro: Some("Estoque duplicado".to_string()) };
        assert_eq!(erro.mensagem_exibicao(), "Estoque duplicado");
    }

    #[test]
    fn falhas_sem_mensagem_usam_texto_generico() {
        let sem_corpo = ApiError::Resposta { status: 500, erro: None };
        assert_eq!(sem_corpo.mensagem_exibicao(), MENSAGEM_ERRO_GENERICO);
        assert_eq!(ApiError::TempoEsgotado.mensagem_exibicao(), MENSAGEM_ERRO_GENERICO);
        assert_eq!(
            ApiError::Transporte("connection refused".into()).mensagem_exibicao(),
            MENSAGEM_ERRO_GENERICO
        );
    }

    #[test]
    fn base_url_sem_barra_final() {
        let fabrica = ClientesApi::new("http://localhost:3333/", Duration::from_secs(5)).unwrap();
        assert_eq!(fabrica.base_url, "http://localhost:3333");
    }
}
