// src/produtos/listagem.rs

use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::warn;

use super::produtos_structs::ProdutoRegistro;
use crate::shared::api_client::HttpClient;

/// Tipo exibido quando o produto não tem `type` definido.
pub const TIPO_PADRAO: &str = "Gema";

/// Título do modal de confirmação de exclusão.
pub const TITULO_CONFIRMACAO: &str = "Tem certeza que deseja excluir?";

/// Coluna da tabela de produtos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coluna {
    pub header: &'static str,
    pub accessor: &'static str,
}

pub static COLUNAS: [Coluna; 8] = [
    Coluna { header: "Id do Estoque", accessor: "stock_id" },
    Coluna { header: "Status", accessor: "sold" },
    Coluna { header: "Visível", accessor: "visible" },
    Coluna { header: "Tipo", accessor: "type" },
    Coluna { header: "Nome", accessor: "name" },
    Coluna { header: "Preço", accessor: "price" },
    Coluna { header: "Pedra", accessor: "stone" },
    Coluna { header: "Ações", accessor: "_id" },
];

/// Links de ação de uma linha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcoesLinha {
    pub images: String,
    pub edit: String,
}

/// Linha da tabela, com as referências do catálogo já resolvidas para nomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinhaProduto {
    #[serde(rename = "_id")]
    pub id: String,
    pub sold: bool,
    pub sold_label: &'static str,
    pub visible: bool,
    pub visible_label: &'static str,
    #[serde(rename = "type")]
    pub tipo: String,
    pub stock_id: i64,
    pub name: String,
    pub price: i64,
    pub stone: Option<String>,
    #[serde(rename = "stoneWeigth")]
    pub stone_weigth: Option<BigDecimal>,
    #[serde(rename = "diamondWeigth")]
    pub diamond_weigth: Option<BigDecimal>,
    pub shape: Option<String>,
    pub actions: AcoesLinha,
}

impl From<&ProdutoRegistro> for LinhaProduto {
    fn from(produto: &ProdutoRegistro) -> Self {
        LinhaProduto {
            id: produto.id.clone(),
            sold: produto.sold,
            sold_label: if produto.sold { "Vendido" } else { "Em estoque" },
            visible: produto.visible,
            visible_label: if produto.visible { "Visível" } else { "Escondido" },
            tipo: produto
                .tipo
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| TIPO_PADRAO.to_string()),
            stock_id: produto.stock_id,
            name: produto.name.clone(),
            price: produto.price,
            stone: produto.stone.as_ref().map(|p| p.name.clone()),
            stone_weigth: produto.stone_weigth.clone(),
            diamond_weigth: produto.diamond_weigth.clone(),
            shape: produto.shape.as_ref().map(|f| f.name.clone()),
            actions: AcoesLinha {
                images: format!("/products/images/{}", produto.id),
                edit: format!("/products/edit/{}", produto.id),
            },
        }
    }
}

/// Projeta os produtos nas linhas da tabela, na mesma ordem.
pub fn linhas_tabela(produtos: &[ProdutoRegistro]) -> Vec<LinhaProduto> {
    produtos.iter().map(LinhaProduto::from).collect()
}

/// Tabela pronta para a interface.
#[derive(Debug, Serialize)]
pub struct TabelaProdutos {
    pub columns: &'static [Coluna],
    pub data: Vec<LinhaProduto>,
}

impl TabelaProdutos {
    pub fn new(produtos: &[ProdutoRegistro]) -> Self {
        TabelaProdutos { columns: &COLUNAS, data: linhas_tabela(produtos) }
    }
}

/// Estado do modal de confirmação de exclusão.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalConfirmacao {
    pub visivel: bool,
    pub id: Option<String>,
    pub linha: Option<usize>,
    pub erro: Option<String>,
}

/// Página serializada: a tabela mais o modal de confirmação.
#[derive(Debug, Serialize)]
pub struct VisaoPagina {
    #[serde(flatten)]
    pub tabela: TabelaProdutos,
    pub modal: ModalConfirmacao,
    pub titulo_confirmacao: &'static str,
}

/// Página de listagem de produtos do backoffice.
#[derive(Debug, Clone, Default)]
pub struct PaginaProdutos {
    produtos: Vec<ProdutoRegistro>,
    modal: ModalConfirmacao,
}

impl PaginaProdutos {
    pub fn new(produtos: Vec<ProdutoRegistro>) -> Self {
        PaginaProdutos { produtos, modal: ModalConfirmacao::default() }
    }

    pub fn produtos(&self) -> &[ProdutoRegistro] {
        &self.produtos
    }

    pub fn modal(&self) -> &ModalConfirmacao {
        &self.modal
    }

    pub fn tabela(&self) -> TabelaProdutos {
        TabelaProdutos::new(&self.produtos)
    }

    pub fn visao(&self) -> VisaoPagina {
        VisaoPagina { tabela: self.tabela(), modal: self.modal.clone(), titulo_confirmacao: TITULO_CONFIRMACAO }
    }

    pub fn abrir_modal(&mut self, id: &str, linha: usize) {
        self.modal.id = Some(id.to_string());
        self.modal.linha = Some(linha);
        self.modal.visivel = true;
    }

    pub fn fechar_modal(&mut self) {
        self.modal = ModalConfirmacao::default();
    }

    /// Confirma a exclusão do produto do modal.
    ///
    /// Em caso de sucesso a linha sai da tabela e o modal fecha; em caso de falha
    /// o modal continua aberto com a mensagem de erro. Devolve `true` se excluiu.
    pub async fn confirmar_exclusao(&mut self, cliente: &dyn HttpClient) -> bool {
        let Some(id) = self.modal.id.clone() else {
            return false;
        };

        match cliente.delete(&format!("/product/{}", id)).await {
            Ok(_) => {
                // Remove pela linha registrada, conferindo o id para não apagar a linha errada
                match self.modal.linha {
                    Some(linha) if self.produtos.get(linha).map(|p| p.id.as_str()) == Some(id.as_str()) => {
                        self.produtos.remove(linha);
                    }
                    _ => self.produtos.retain(|p| p.id != id),
                }
                self.fechar_modal();
                true
            }
            Err(e) => {
                warn!(erro = %e, id = %id, "Falha ao excluir produto");
                self.modal.erro = Some(e.mensagem_exibicao());
                false
            }
        }
    }
}
