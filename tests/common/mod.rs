// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use dunna::shared::api_client::{ApiError, FabricaClientes, HttpClient};
use dunna::usuarios::usuario_structs::Claims;
use dunna::AppState;

pub const SEGREDO: &str = "segredo_de_teste";

#[derive(Debug, Clone, PartialEq)]
pub struct Chamada {
    pub metodo: String,
    pub url: String,
    pub corpo: Value,
    pub token: Option<String>,
}

/// API do catálogo em memória: respostas por (método, url) e registro das chamadas.
#[derive(Default)]
pub struct ApiFalsa {
    respostas: Mutex<HashMap<(String, String), Result<Value, ApiError>>>,
    chamadas: Mutex<Vec<Chamada>>,
}

impl ApiFalsa {
    pub fn new() -> Arc<Self> {
        Arc::new(ApiFalsa::default())
    }

    pub fn responder(&self, metodo: &str, url: &str, resposta: Result<Value, ApiError>) {
        self.respostas
            .lock()
            .unwrap()
            .insert((metodo.to_string(), url.to_string()), resposta);
    }

    /// Cadastra as quatro listas de opções do formulário.
    pub fn com_catalogo(&self) {
        self.responder("get", "/stones", Ok(json!([{ "_id": "p1", "name": "Esmeralda" }])));
        self.responder("get", "/shapes", Ok(json!([{ "_id": "f1", "name": "Oval" }])));
        self.responder(
            "get",
            "/types",
            Ok(json!([{ "_id": "t1", "name": "Joia" }, { "_id": "t2", "name": "Gema" }])),
        );
        self.responder("get", "/metals", Ok(json!([{ "_id": "m1", "name": "Ouro 18k" }])));
    }

    pub fn chamadas(&self) -> Vec<Chamada> {
        self.chamadas.lock().unwrap().clone()
    }

    pub fn chamadas_de(&self, metodo: &str) -> Vec<Chamada> {
        self.chamadas().into_iter().filter(|c| c.metodo == metodo).collect()
    }

    fn atender(&self, metodo: &str, url: &str, corpo: Value, token: Option<String>) -> Result<Value, ApiError> {
        self.chamadas.lock().unwrap().push(Chamada {
            metodo: metodo.to_string(),
            url: url.to_string(),
            corpo,
            token,
        });
        self.respostas
            .lock()
            .unwrap()
            .get(&(metodo.to_string(), url.to_string()))
            .cloned()
            .unwrap_or(Err(ApiError::Resposta { status: 404, erro: Some("Rota não encontrada".into()) }))
    }
}

struct ClienteFalso {
    api: Arc<ApiFalsa>,
    token: Option<String>,
}

#[async_trait]
impl HttpClient for ClienteFalso {
    async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.api.atender("get", url, Value::Null, self.token.clone())
    }
    async fn post(&self, url: &str, corpo: &Value) -> Result<Value, ApiError> {
        self.api.atender("post", url, corpo.clone(), self.token.clone())
    }
    async fn patch(&self, url: &str, corpo: &Value) -> Result<Value, ApiError> {
        self.api.atender("patch", url, corpo.clone(), self.token.clone())
    }
    async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        self.api.atender("delete", url, Value::Null, self.token.clone())
    }
}

pub struct FabricaFalsa(pub Arc<ApiFalsa>);

impl FabricaClientes for FabricaFalsa {
    fn para_sessao(&self, token: Option<&str>) -> Box<dyn HttpClient> {
        Box::new(ClienteFalso { api: Arc::clone(&self.0), token: token.map(str::to_string) })
    }
}

pub fn estado(api: &Arc<ApiFalsa>) -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(FabricaFalsa(Arc::clone(api))), SEGREDO.to_string()))
}

pub fn token(admin: bool, validade: Duration) -> String {
    let claims = Claims {
        sub: "u1".to_string(),
        name: "Ana".to_string(),
        email: "ana@dunna.com.br".to_string(),
        admin,
        exp: (Utc::now() + validade).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SEGREDO.as_bytes())).unwrap()
}

pub fn token_admin() -> String {
    token(true, Duration::hours(1))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn gema() -> Value {
    json!({
        "productType": "t2",
        "stock_id": "77",
        "name": "Esmeralda oval",
        "description": "Esmeralda de 2 quilates",
        "price": 180000,
        "stone": "p1",
        "stoneWeigth": "2.05",
        "shape": "f1"
    })
}
