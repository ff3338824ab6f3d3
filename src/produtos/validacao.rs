// src/produtos/validacao.rs

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::produtos_structs::{DadosFormulario, ProdutoValidado, TIPO_JOIA};

/// Mensagem para campos numéricos que não podem ser convertidos.
pub const MENSAGEM_NUMERO: &str = "Você deve escrever um número";

fn erro_numero() -> ValidationError {
    let mut erro = ValidationError::new("numero");
    erro.message = Some(Cow::Borrowed(MENSAGEM_NUMERO));
    erro
}

fn numero_inteiro(valor: &str) -> Result<(), ValidationError> {
    valor.parse::<i64>().map(|_| ()).map_err(|_| erro_numero())
}

fn numero_decimal(valor: &str) -> Result<(), ValidationError> {
    BigDecimal::from_str(valor).map(|_| ()).map_err(|_| erro_numero())
}

/// Produto de qualquer tipo que não seja joia.
#[derive(Debug, Clone, Validate)]
pub struct ProdutoBase {
    #[validate(required(message = "O tipo de produto é obrigatório"))]
    pub product_type: Option<String>,
    #[validate(required(message = "O id do estoque é obrigatório"), custom = "numero_inteiro")]
    pub stock_id: Option<String>,
    #[validate(required(message = "O nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(required(message = "A descrição é obrigatória"))]
    pub description: Option<String>,
    #[validate(required(message = "O preço é obrigatório"), custom = "numero_inteiro")]
    pub price: Option<String>,
    #[validate(required(message = "A pedra é obrigatória"))]
    pub stone: Option<String>,
    #[validate(required(message = "O peso da pedra é obrigatório"), custom = "numero_decimal")]
    pub stone_weigth: Option<String>,
    #[validate(required(message = "O formato é obrigatório"))]
    pub shape: Option<String>,
}

/// Joia: os campos do produto base mais peso do diamante e metal.
#[derive(Debug, Clone, Validate)]
pub struct ProdutoJoia {
    #[validate(required(message = "O tipo de produto é obrigatório"))]
    pub product_type: Option<String>,
    #[validate(required(message = "O id do estoque é obrigatório"), custom = "numero_inteiro")]
    pub stock_id: Option<String>,
    #[validate(required(message = "O nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(required(message = "A descrição é obrigatória"))]
    pub description: Option<String>,
    #[validate(required(message = "O preço é obrigatório"), custom = "numero_inteiro")]
    pub price: Option<String>,
    #[validate(required(message = "A pedra é obrigatória"))]
    pub stone: Option<String>,
    #[validate(required(message = "O peso da pedra é obrigatório"), custom = "numero_decimal")]
    pub stone_weigth: Option<String>,
    #[validate(required(message = "O peso do diamante é obrigatório"), custom = "numero_decimal")]
    pub diamond_weigth: Option<String>,
    #[validate(required(message = "O formato é obrigatório"))]
    pub shape: Option<String>,
    #[validate(required(message = "O metal é obrigatório"))]
    pub metal: Option<String>,
}

impl From<&DadosFormulario> for ProdutoBase {
    fn from(dados: &DadosFormulario) -> Self {
        ProdutoBase {
            product_type: dados.texto("productType"),
            stock_id: dados.texto("stock_id"),
            name: dados.texto("name"),
            description: dados.texto("description"),
            price: dados.texto("price"),
            stone: dados.texto("stone"),
            stone_weigth: dados.texto("stoneWeigth"),
            shape: dados.texto("shape"),
        }
    }
}

impl From<&DadosFormulario> for ProdutoJoia {
    fn from(dados: &DadosFormulario) -> Self {
        ProdutoJoia {
            product_type: dados.texto("productType"),
            stock_id: dados.texto("stock_id"),
            name: dados.texto("name"),
            description: dados.texto("description"),
            price: dados.texto("price"),
            stone: dados.texto("stone"),
            stone_weigth: dados.texto("stoneWeigth"),
            diamond_weigth: dados.texto("diamondWeigth"),
            shape: dados.texto("shape"),
            metal: dados.texto("metal"),
        }
    }
}

impl ProdutoBase {
    fn validado(self) -> Option<ProdutoValidado> {
        Some(ProdutoValidado {
            product_type: self.product_type?,
            stock_id: self.stock_id?.parse().ok()?,
            name: self.name?,
            description: self.description?,
            price: self.price?.parse().ok()?,
            stone: self.stone?,
            stone_weigth: BigDecimal::from_str(&self.stone_weigth?).ok()?,
            diamond_weigth: None,
            shape: self.shape?,
            metal: None,
        })
    }
}

impl ProdutoJoia {
    fn validado(self) -> Option<ProdutoValidado> {
        Some(ProdutoValidado {
            product_type: self.product_type?,
            stock_id: self.stock_id?.parse().ok()?,
            name: self.name?,
            description: self.description?,
            price: self.price?.parse().ok()?,
            stone: self.stone?,
            stone_weigth: BigDecimal::from_str(&self.stone_weigth?).ok()?,
            diamond_weigth: Some(BigDecimal::from_str(&self.diamond_weigth?).ok()?),
            shape: self.shape?,
            metal: Some(self.metal?),
        })
    }
}

fn validar_base(dados: &DadosFormulario) -> Result<ProdutoValidado, ValidationErrors> {
    let produto = ProdutoBase::from(dados);
    produto.validate()?;
    produto.validado().ok_or_else(ValidationErrors::new)
}

fn validar_joia(dados: &DadosFormulario) -> Result<ProdutoValidado, ValidationErrors> {
    let produto = ProdutoJoia::from(dados);
    produto.validate()?;
    produto.validado().ok_or_else(ValidationErrors::new)
}

/// Campo do formulário e o atributo correspondente na struct validada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampoRegra {
    pub campo: &'static str,
    pub atributo: &'static str,
}

const fn campo(campo: &'static str, atributo: &'static str) -> CampoRegra {
    CampoRegra { campo, atributo }
}

/// Conjunto nomeado de regras. `campos` define a ordem das violações.
pub struct ConjuntoRegras {
    nome: &'static str,
    campos: &'static [CampoRegra],
    verificar: fn(&DadosFormulario) -> Result<ProdutoValidado, ValidationErrors>,
}

impl fmt::Debug for ConjuntoRegras {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConjuntoRegras").field("nome", &self.nome).field("campos", &self.campos).finish()
    }
}

impl ConjuntoRegras {
    pub fn nome(&self) -> &'static str {
        self.nome
    }

    pub fn campos(&self) -> impl Iterator<Item = &'static str> {
        self.campos.iter().map(|c| c.campo)
    }
}

pub static REGRAS_BASE: ConjuntoRegras = ConjuntoRegras {
    nome: "base",
    campos: &[
        campo("productType", "product_type"),
        campo("stock_id", "stock_id"),
        campo("name", "name"),
        campo("description", "description"),
        campo("price", "price"),
        campo("stone", "stone"),
        campo("stoneWeigth", "stone_weigth"),
        campo("shape", "shape"),
    ],
    verificar: validar_base,
};

pub static REGRAS_JOIA: ConjuntoRegras = ConjuntoRegras {
    nome: "joia",
    campos: &[
        campo("productType", "product_type"),
        campo("stock_id", "stock_id"),
        campo("name", "name"),
        campo("description", "description"),
        campo("price", "price"),
        campo("stone", "stone"),
        campo("stoneWeigth", "stone_weigth"),
        campo("diamondWeigth", "diamond_weigth"),
        campo("shape", "shape"),
        campo("metal", "metal"),
    ],
    verificar: validar_joia,
};

/// Escolhe o conjunto de regras a partir do rótulo do tipo selecionado.
pub fn regras_para_tipo(rotulo: &str) -> &'static ConjuntoRegras {
    if rotulo == TIPO_JOIA {
        &REGRAS_JOIA
    } else {
        &REGRAS_BASE
    }
}

/// Violação de uma regra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolacaoCampo {
    pub campo: String,
    pub mensagem: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpcoesValidacao {
    /// Para na primeira violação em vez de coletar todas.
    pub abort_early: bool,
}

fn mensagem(erro: &ValidationError) -> String {
    erro.message.as_deref().unwrap_or(&*erro.code).to_string()
}

/// Valida os dados do formulário contra um conjunto de regras.
///
/// Com `abort_early = false` todas as violações são devolvidas, na ordem dos campos do conjunto.
pub fn validar(
    dados: &DadosFormulario,
    regras: &ConjuntoRegras,
    opcoes: OpcoesValidacao,
) -> Result<ProdutoValidado, Vec<ViolacaoCampo>> {
    let erros = match (regras.verificar)(dados) {
        Ok(produto) => return Ok(produto),
        Err(erros) => erros,
    };

    let por_campo = erros.field_errors();
    let mut violacoes: Vec<ViolacaoCampo> = regras
        .campos
        .iter()
        .filter_map(|c| {
            por_campo.get(c.atributo).and_then(|lista| lista.first()).map(|erro| ViolacaoCampo {
                campo: c.campo.to_string(),
                mensagem: mensagem(erro),
            })
        })
        .collect();

    if violacoes.is_empty() {
        violacoes.push(ViolacaoCampo {
            campo: "productType".to_string(),
            mensagem: format!("Conjunto de regras '{}' incompleto", regras.nome),
        });
    }
    if opcoes.abort_early {
        violacoes.truncate(1);
    }
    Err(violacoes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gema_completa() -> DadosFormulario {
        DadosFormulario::new()
            .com("productType", "t-gema")
            .com("stock_id", "1042")
            .com("name", "Esmeralda lapidada")
            .com("description", "Esmeralda colombiana")
            .com("price", "250000")
            .com("stone", "p1")
            .com("stoneWeigth", "1.25")
            .com("shape", "f1")
    }

    fn campos(violacoes: &[ViolacaoCampo]) -> Vec<&str> {
        violacoes.iter().map(|v| v.campo.as_str()).collect()
    }

    #[test]
    fn rotulo_joia_seleciona_regras_estendidas() {
        assert_eq!(regras_para_tipo("Joia").nome(), "joia");
        assert_eq!(regras_para_tipo("Gema").nome(), "base");
        assert_eq!(regras_para_tipo("joia").nome(), "base");
    }

    #[test]
    fn regras_base_nao_exigem_diamante_nem_metal() {
        let produto = validar(&gema_completa(), &REGRAS_BASE, OpcoesValidacao::default()).unwrap();
        assert_eq!(produto.stock_id, 1042);
        assert_eq!(produto.price, 250000);
        assert_eq!(produto.stone_weigth, BigDecimal::from_str("1.25").unwrap());
        assert!(produto.diamond_weigth.is_none());
        assert!(produto.metal.is_none());
    }

    #[test]
    fn regras_joia_exigem_diamante_e_metal() {
        let violacoes = validar(&gema_completa(), &REGRAS_JOIA, OpcoesValidacao::default()).unwrap_err();
        assert_eq!(campos(&violacoes), ["diamondWeigth", "metal"]);
        assert_eq!(violacoes[0].mensagem, "O peso do diamante é obrigatório");
        assert_eq!(violacoes[1].mensagem, "O metal é obrigatório");
    }

    #[test]
    fn coleta_todas_as_violacoes() {
        let dados = DadosFormulario::new()
            .com("productType", "t1")
            .com("stock_id", "abc")
            .com("name", "   ");
        let violacoes = validar(&dados, &REGRAS_BASE, OpcoesValidacao { abort_early: false }).unwrap_err();
        assert_eq!(
            campos(&violacoes),
            ["stock_id", "name", "description", "price", "stone", "stoneWeigth", "shape"]
        );
        assert_eq!(violacoes[0].mensagem, MENSAGEM_NUMERO);
        assert_eq!(violacoes[1].mensagem, "O nome é obrigatório");
    }

    #[test]
    fn abort_early_para_na_primeira() {
        let violacoes =
            validar(&DadosFormulario::new(), &REGRAS_JOIA, OpcoesValidacao { abort_early: true }).unwrap_err();
        assert_eq!(campos(&violacoes), ["productType"]);
    }

    #[test]
    fn numeros_aceitos_como_json() {
        let dados = gema_completa()
            .com("price", 99900)
            .com("stoneWeigth", 0.5)
            .com("diamondWeigth", 0.12)
            .com("metal", "m1");
        let produto = validar(&dados, &REGRAS_JOIA, OpcoesValidacao::default()).unwrap();
        assert_eq!(produto.price, 99900);
        assert_eq!(produto.diamond_weigth, Some(BigDecimal::from_str("0.12").unwrap()));
        assert_eq!(produto.metal.as_deref(), Some("m1"));
    }

    #[test]
    fn peso_com_virgula_nao_e_numero() {
        let dados = gema_completa().com("stoneWeigth", "1,25");
        let violacoes = validar(&dados, &REGRAS_BASE, OpcoesValidacao::default()).unwrap_err();
        assert_eq!(campos(&violacoes), ["stoneWeigth"]);
        assert_eq!(violacoes[0].mensagem, MENSAGEM_NUMERO);
    }

    #[test]
    fn struct_joia_reporta_campos_ausentes() {
        let erros = ProdutoJoia::from(&gema_completa()).validate().unwrap_err();
        let mut chaves: Vec<&str> = erros.field_errors().into_keys().collect();
        chaves.sort();
        assert_eq!(chaves, ["diamond_weigth", "metal"]);
        assert_eq!(REGRAS_JOIA.campos().count(), 10);
    }

    #[test]
    fn preco_em_centavos_nao_aceita_fracao() {
        let dados = gema_completa().com("price", "10.50");
        let violacoes = validar(&dados, &REGRAS_BASE, OpcoesValidacao::default()).unwrap_err();
        assert_eq!(violacoes, vec![ViolacaoCampo { campo: "price".into(), mensagem: MENSAGEM_NUMERO.into() }]);
    }
}
