// src/vendas/vendas_structs.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::produtos::produtos_structs::ProdutoRegistro;

/// Mensagem exibida quando não há itens no carrinho.
pub const MENSAGEM_CARRINHO_VAZIO: &str = "O carrinho está vazio";

/// Item do carrinho. Cada peça é única, então não há quantidade.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ItemCarrinho {
    #[serde(rename = "_id")]
    pub id: String,
    pub stock_id: i64,
    pub name: String,
    pub price: i64, // Centavos
}

impl From<&ProdutoRegistro> for ItemCarrinho {
    fn from(produto: &ProdutoRegistro) -> Self {
        ItemCarrinho {
            id: produto.id.clone(),
            stock_id: produto.stock_id,
            name: produto.name.clone(),
            price: produto.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErroCarrinho {
    #[error("O produto {0} já foi vendido.")]
    ProdutoVendido(String),
    #[error("O produto {0} já está no carrinho.")]
    ProdutoRepetido(String),
}

/// Carrinho de compras da sessão.
///
/// Os itens só mudam pelas operações abaixo, que recalculam o total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carrinho {
    itens: Vec<ItemCarrinho>,
    total: i64,
}

impl Carrinho {
    pub fn itens(&self) -> &[ItemCarrinho] {
        &self.itens
    }

    /// Total em centavos.
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn vazio(&self) -> bool {
        self.itens.is_empty()
    }

    pub fn adicionar(&mut self, produto: &ProdutoRegistro) -> Result<(), ErroCarrinho> {
        if produto.sold {
            return Err(ErroCarrinho::ProdutoVendido(produto.name.clone()));
        }
        if self.itens.iter().any(|item| item.id == produto.id) {
            return Err(ErroCarrinho::ProdutoRepetido(produto.name.clone()));
        }
        self.itens.push(ItemCarrinho::from(produto));
        self.recalcular();
        Ok(())
    }

    /// Remove o item; devolve `false` se ele não estava no carrinho.
    pub fn remover(&mut self, id: &str) -> bool {
        let antes = self.itens.len();
        self.itens.retain(|item| item.id != id);
        self.recalcular();
        self.itens.len() != antes
    }

    pub fn limpar(&mut self) {
        self.itens.clear();
        self.recalcular();
    }

    fn recalcular(&mut self) {
        // Preços vêm da API; a soma satura em vez de estourar
        self.total = self.itens.iter().fold(0i64, |total, item| total.saturating_add(item.price));
    }

    pub fn visao(&self) -> VisaoCarrinho {
        if self.vazio() {
            return VisaoCarrinho {
                mensagem: Some(MENSAGEM_CARRINHO_VAZIO),
                itens: Vec::new(),
                quantidade: 0,
                total: 0,
                total_formatado: formatar_centavos(0),
                metodos_pagamento: Vec::new(),
            };
        }

        VisaoCarrinho {
            mensagem: None,
            itens: self.itens.clone(),
            quantidade: self.itens.len(),
            total: self.total,
            total_formatado: formatar_centavos(self.total),
            metodos_pagamento: METODOS_PAGAMENTO.to_vec(),
        }
    }
}

/// Carrinhos em memória, um por sessão (usuário logado ou cookie de visitante).
#[derive(Debug, Clone, Default)]
pub struct Carrinhos {
    por_sessao: HashMap<String, Carrinho>,
}

impl Carrinhos {
    pub fn carrinho(&self, sessao: &str) -> Option<&Carrinho> {
        self.por_sessao.get(sessao)
    }

    /// Carrinho da sessão, criado vazio no primeiro uso.
    pub fn carrinho_mut(&mut self, sessao: &str) -> &mut Carrinho {
        self.por_sessao.entry(sessao.to_string()).or_default()
    }

    pub fn existente_mut(&mut self, sessao: &str) -> Option<&mut Carrinho> {
        self.por_sessao.get_mut(sessao)
    }

    pub fn visao(&self, sessao: &str) -> VisaoCarrinho {
        self.carrinho(sessao).map(Carrinho::visao).unwrap_or_else(|| Carrinho::default().visao())
    }
}

/// Formata centavos com duas casas decimais (ex.: 123456 -> "1234.56").
pub fn formatar_centavos(centavos: i64) -> String {
    let sinal = if centavos < 0 { "-" } else { "" };
    let absoluto = centavos.unsigned_abs();
    format!("{}{}.{:02}", sinal, absoluto / 100, absoluto % 100)
}

/// Método de pagamento oferecido no checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetodoPagamento {
    pub nome: &'static str,
    pub link: &'static str,
}

pub const METODOS_PAGAMENTO: [MetodoPagamento; 2] = [
    MetodoPagamento { nome: "Stripe", link: "/checkout?method=stripe" },
    MetodoPagamento { nome: "Paypal", link: "/checkout?method=paypal" },
];

/// Conteúdo do carrinho para exibição.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisaoCarrinho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<&'static str>,
    pub itens: Vec<ItemCarrinho>,
    pub quantidade: usize,
    pub total: i64,
    pub total_formatado: String,
    pub metodos_pagamento: Vec<MetodoPagamento>,
}

/// Corpo da requisição para adicionar um produto ao carrinho.
#[derive(Debug, Deserialize)]
pub struct NovoItemCarrinho {
    #[serde(rename = "productId")]
    pub product_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn produto(id: &str, price: i64, sold: bool) -> ProdutoRegistro {
        serde_json::from_value(json!({
            "_id": id, "stock_id": 10, "name": format!("Peça {}", id), "price": price, "sold": sold
        }))
        .unwrap()
    }

    #[test]
    fn total_acompanha_adicoes_e_remocoes() {
        let mut carrinho = Carrinho::default();
        carrinho.adicionar(&produto("a", 150000, false)).unwrap();
        carrinho.adicionar(&produto("b", 2550, false)).unwrap();
        assert_eq!(carrinho.total(), 152550);

        assert!(carrinho.remover("a"));
        assert!(!carrinho.remover("a"));
        assert_eq!(carrinho.total(), 2550);

        carrinho.limpar();
        assert_eq!(carrinho.total(), 0);
        assert!(carrinho.vazio());
    }

    #[test]
    fn pecas_repetidas_ou_vendidas_sao_recusadas() {
        let mut carrinho = Carrinho::default();
        carrinho.adicionar(&produto("a", 1000, false)).unwrap();

        assert_eq!(
            carrinho.adicionar(&produto("a", 1000, false)),
            Err(ErroCarrinho::ProdutoRepetido("Peça a".into()))
        );
        assert_eq!(
            carrinho.adicionar(&produto("v", 1000, true)),
            Err(ErroCarrinho::ProdutoVendido("Peça v".into()))
        );
        assert_eq!(carrinho.itens().len(), 1);
    }

    #[test]
    fn visao_vazia_mostra_mensagem() {
        let visao = Carrinho::default().visao();
        assert_eq!(visao.mensagem, Some("O carrinho está vazio"));
        assert!(visao.metodos_pagamento.is_empty());
    }

    #[test]
    fn visao_com_itens_formata_total_e_oferece_pagamentos() {
        let mut carrinho = Carrinho::default();
        carrinho.adicionar(&produto("a", 123456, false)).unwrap();
        carrinho.adicionar(&produto("b", 4, false)).unwrap();

        let visao = carrinho.visao();
        assert_eq!(visao.total_formatado, "1234.60");
        assert_eq!(visao.quantidade, 2);
        let links: Vec<_> = visao.metodos_pagamento.iter().map(|m| m.link).collect();
        assert_eq!(links, ["/checkout?method=stripe", "/checkout?method=paypal"]);
    }

    #[test]
    fn total_satura_com_precos_enormes() {
        let mut carrinho = Carrinho::default();
        carrinho.adicionar(&produto("a", i64::MAX, false)).unwrap();
        carrinho.adicionar(&produto("b", 10, false)).unwrap();
        assert_eq!(carrinho.total(), i64::MAX);

        carrinho.remover("a");
        assert_eq!(carrinho.total(), 10);
    }

    #[test]
    fn cada_sessao_tem_seu_carrinho() {
        let mut carrinhos = Carrinhos::default();
        carrinhos.carrinho_mut("usuario:u1").adicionar(&produto("a", 1000, false)).unwrap();

        assert_eq!(carrinhos.carrinho("usuario:u1").map(Carrinho::total), Some(1000));
        assert!(carrinhos.carrinho("visitante:x").is_none());
        assert_eq!(carrinhos.visao("visitante:x").mensagem, Some(MENSAGEM_CARRINHO_VAZIO));
    }

    #[test]
    fn formatacao_de_centavos() {
        assert_eq!(formatar_centavos(0), "0.00");
        assert_eq!(formatar_centavos(5), "0.05");
        assert_eq!(formatar_centavos(100), "1.00");
        assert_eq!(formatar_centavos(-250), "-2.50");
    }
}
