// src/produtos/produtos_structs.rs

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::catalogo::catalogo_structs::EntidadeCatalogo;

/// Rótulo do tipo de produto que ativa as regras de joia.
pub const TIPO_JOIA: &str = "Joia";

/// Imagem associada a um produto.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImagemProduto {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
}

/// Produto como devolvido pela API (`/productsall`, `/product/{id}`).
/// As referências ao catálogo vêm como entidades `{ _id, name }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProdutoRegistro {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(rename = "productType", default)]
    pub product_type: Option<EntidadeCatalogo>,
    #[serde(rename = "type", default)]
    pub tipo: Option<EntidadeCatalogo>,
    pub stock_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64, // Preço em centavos
    #[serde(default)]
    pub stone: Option<EntidadeCatalogo>,
    #[serde(rename = "stoneWeigth", default)]
    pub stone_weigth: Option<BigDecimal>,
    #[serde(rename = "diamondWeigth", default)]
    pub diamond_weigth: Option<BigDecimal>,
    #[serde(default)]
    pub shape: Option<EntidadeCatalogo>,
    #[serde(default)]
    pub metal: Option<EntidadeCatalogo>,
    #[serde(default)]
    pub images: Vec<ImagemProduto>,
}

/// Dados brutos enviados pelo formulário: nome do campo -> valor digitado.
///
/// Os campos de seleção carregam o `value` da opção escolhida (o `_id`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DadosFormulario(pub BTreeMap<String, Value>);

impl DadosFormulario {
    pub fn new() -> Self {
        DadosFormulario(BTreeMap::new())
    }

    /// Define um campo (útil para montar formulários em código e testes).
    pub fn com(mut self, campo: &str, valor: impl Into<Value>) -> Self {
        self.0.insert(campo.to_string(), valor.into());
        self
    }

    /// Valor textual do campo, sem espaços nas pontas.
    /// Números são convertidos para texto; `null` e campos vazios contam como ausentes.
    pub fn texto(&self, campo: &str) -> Option<String> {
        let texto = match self.0.get(campo)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if texto.is_empty() {
            None
        } else {
            Some(texto)
        }
    }
}

/// Produto validado, pronto para ser enviado à API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProdutoValidado {
    #[serde(rename = "productType")]
    pub product_type: String,
    pub stock_id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stone: String,
    #[serde(rename = "stoneWeigth", serialize_with = "decimal_como_numero")]
    pub stone_weigth: BigDecimal,
    #[serde(
        rename = "diamondWeigth",
        skip_serializing_if = "Option::is_none",
        serialize_with = "decimal_opcional_como_numero"
    )]
    pub diamond_weigth: Option<BigDecimal>,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metal: Option<String>,
}

// Pesos vão para a API como número JSON, igual a `price` e `stock_id`.
fn decimal_como_numero<S: Serializer>(valor: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    let numero: f64 = valor.to_string().parse().map_err(S::Error::custom)?;
    serializer.serialize_f64(numero)
}

fn decimal_opcional_como_numero<S: Serializer>(
    valor: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match valor {
        Some(valor) => decimal_como_numero(valor, serializer),
        None => serializer.serialize_none(),
    }
}

/// Método de envio do formulário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetodoEnvio {
    Post,  // Cadastro
    Patch, // Edição
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn pesos_sao_enviados_como_numero() {
        let produto = ProdutoValidado {
            product_type: "t1".into(),
            stock_id: 3,
            name: "Anel".into(),
            description: "Anel de ouro".into(),
            price: 120000,
            stone: "p1".into(),
            stone_weigth: BigDecimal::from_str("2.05").unwrap(),
            diamond_weigth: Some(BigDecimal::from_str("0.3").unwrap()),
            shape: "f1".into(),
            metal: Some("m1".into()),
        };

        let corpo = serde_json::to_value(&produto).unwrap();
        assert_eq!(corpo["stoneWeigth"], json!(2.05));
        assert_eq!(corpo["diamondWeigth"], json!(0.3));
        assert_eq!(corpo["price"], json!(120000));
    }
}
