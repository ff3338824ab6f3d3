// src/produtos/formulario.rs

//! Formulário de cadastro e edição de produtos.
//!
//! O formulário valida os dados com o conjunto de regras do tipo selecionado e
//! envia o produto validado para a API (`post` cria, `patch` atualiza). Erros de
//! validação ficam no registro de campos; erros do servidor viram a mensagem do
//! formulário. Nenhum dado digitado é perdido em caso de falha.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::produtos_structs::{DadosFormulario, MetodoEnvio, ProdutoRegistro, ProdutoValidado, TIPO_JOIA};
use super::validacao::{regras_para_tipo, validar, OpcoesValidacao, ViolacaoCampo};
use crate::catalogo::catalogo_structs::{FontesOpcoes, OpcoesFormulario};
use crate::shared::api_client::{HttpClient, MENSAGEM_ERRO_GENERICO};

/// Mensagem exibida quando o tipo do produto não foi escolhido.
pub const MENSAGEM_TIPO_AUSENTE: &str = "Por favor, preencha o campo tipo do Produto";

/// Página para onde o usuário é levado após um envio bem-sucedido.
pub const ROTA_LISTAGEM: &str = "/products";

/// Erros de validação: campo -> mensagem.
pub type ErrosValidacao = BTreeMap<String, String>;

/// Navegação após o envio.
pub trait Navegador {
    fn replace(&mut self, caminho: &str);
}

/// Navegador que apenas guarda o destino; as rotas o convertem em redirecionamento HTTP.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Redirecionamento {
    pub destino: Option<String>,
}

impl Navegador for Redirecionamento {
    fn replace(&mut self, caminho: &str) {
        self.destino = Some(caminho.to_string());
    }
}

/// Vínculo entre os nomes dos campos e o valor/erro exibidos.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistroCampos {
    valores: BTreeMap<String, Value>,
    erros: ErrosValidacao,
}

impl RegistroCampos {
    /// Valores iniciais a partir de um produto existente (edição).
    /// Referências ao catálogo são gravadas pelo `_id`, que é o valor das opções.
    pub fn a_partir_de(produto: &ProdutoRegistro) -> Self {
        let mut valores = BTreeMap::new();
        let mut definir = |campo: &str, valor: Value| {
            valores.insert(campo.to_string(), valor);
        };

        if let Some(tipo) = &produto.product_type {
            definir("productType", Value::from(tipo.id.clone()));
        }
        definir("stock_id", Value::from(produto.stock_id));
        definir("name", Value::from(produto.name.clone()));
        definir("description", Value::from(produto.description.clone()));
        definir("price", Value::from(produto.price));
        if let Some(pedra) = &produto.stone {
            definir("stone", Value::from(pedra.id.clone()));
        }
        if let Some(peso) = &produto.stone_weigth {
            definir("stoneWeigth", Value::from(peso.to_string()));
        }
        if let Some(peso) = &produto.diamond_weigth {
            definir("diamondWeigth", Value::from(peso.to_string()));
        }
        if let Some(formato) = &produto.shape {
            definir("shape", Value::from(formato.id.clone()));
        }
        if let Some(metal) = &produto.metal {
            definir("metal", Value::from(metal.id.clone()));
        }

        RegistroCampos { valores, erros: BTreeMap::new() }
    }

    /// Substitui todos os erros (não acumula entre tentativas).
    pub fn set_errors(&mut self, erros: ErrosValidacao) {
        self.erros = erros;
    }

    pub fn erros(&self) -> &ErrosValidacao {
        &self.erros
    }

    pub fn erro(&self, campo: &str) -> Option<&str> {
        self.erros.get(campo).map(String::as_str)
    }

    pub fn valor(&self, campo: &str) -> Option<&Value> {
        self.valores.get(campo)
    }

    pub fn valores(&self) -> &BTreeMap<String, Value> {
        &self.valores
    }

    /// Grava os valores digitados pelo usuário.
    pub fn atualizar(&mut self, dados: &DadosFormulario) {
        for (campo, valor) in &dados.0 {
            self.valores.insert(campo.clone(), valor.clone());
        }
    }
}

/// Como um campo é exibido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoEntrada {
    Texto,
    Numero,
    Selecao,
}

/// Descrição de um campo do formulário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DescricaoCampo {
    pub nome: &'static str,
    pub rotulo: &'static str,
    pub tipo: TipoEntrada,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passo: Option<&'static str>,
    #[serde(skip)]
    pub somente_joia: bool,
}

const fn campo(nome: &'static str, rotulo: &'static str, tipo: TipoEntrada) -> DescricaoCampo {
    DescricaoCampo { nome, rotulo, tipo, placeholder: None, passo: None, somente_joia: false }
}

/// Campos na ordem de exibição.
pub static CAMPOS: [DescricaoCampo; 10] = [
    DescricaoCampo { placeholder: Some("Escolha um tipo"), ..campo("productType", "Tipo", TipoEntrada::Selecao) },
    campo("stock_id", "Id do estoque", TipoEntrada::Texto),
    campo("name", "Nome", TipoEntrada::Texto),
    campo("description", "Descrição", TipoEntrada::Texto),
    DescricaoCampo { placeholder: Some("Escolha uma pedra"), ..campo("stone", "Pedra", TipoEntrada::Selecao) },
    DescricaoCampo { placeholder: Some("Escolha um formato"), ..campo("shape", "Formato", TipoEntrada::Selecao) },
    DescricaoCampo { passo: Some(".01"), ..campo("stoneWeigth", "Peso da pedra", TipoEntrada::Numero) },
    campo("price", "Preço em centavos", TipoEntrada::Numero),
    DescricaoCampo {
        passo: Some(".01"),
        somente_joia: true,
        ..campo("diamondWeigth", "Peso do diamante", TipoEntrada::Numero)
    },
    DescricaoCampo {
        placeholder: Some("Escolha um metal"),
        somente_joia: true,
        ..campo("metal", "Metal", TipoEntrada::Selecao)
    },
];

/// Estado da submissão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoFormulario {
    Ocioso,
    Submetendo,
    Concluido,
}

/// Resultado de uma tentativa de envio.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultadoSubmissao {
    /// Nenhum tipo de produto selecionado.
    TipoAusente,
    /// Falha de validação; os erros já estão no registro de campos.
    Invalido(ErrosValidacao),
    /// Dados entregues aos callbacks; quem chamou assume o fluxo.
    Delegado(ProdutoValidado),
    /// Dados válidos, mas o formulário não tem método de envio.
    Validado(ProdutoValidado),
    /// API aceitou o produto; navegação realizada.
    Enviado { destino: String },
    /// API recusou ou não respondeu.
    FalhaServidor(String),
    /// Já existe um envio em andamento (ou concluído) para este formulário.
    EmAndamento,
}

/// Configuração fornecida por quem monta o formulário.
#[derive(Debug, Clone, Default)]
pub struct ConfigFormulario {
    pub link_envio: String,
    pub metodo: Option<MetodoEnvio>,
    pub titulo: String,
    pub dados_iniciais: Option<ProdutoRegistro>,
    pub fontes: FontesOpcoes,
    pub sem_carregamento: bool,
}

/// Visão serializável do formulário para a interface.
#[derive(Debug, Serialize)]
pub struct DescricaoFormulario<'a> {
    pub titulo: &'a str,
    pub tipo_selecionado: Option<&'a str>,
    pub campos: Vec<&'static DescricaoCampo>,
    pub opcoes: &'a OpcoesFormulario,
    pub valores: &'a BTreeMap<String, Value>,
    pub erros: &'a ErrosValidacao,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro_formulario: Option<&'a str>,
    pub carregando: bool,
}

type CallbackDados = Box<dyn FnMut(ProdutoValidado)>;
type CallbackEtapa = Box<dyn FnMut(u8)>;

/// Formulário de produto.
pub struct FormularioProduto {
    link_envio: String,
    metodo: Option<MetodoEnvio>,
    titulo: String,
    sem_carregamento: bool,
    fontes: FontesOpcoes,
    opcoes: OpcoesFormulario,
    tipo_selecionado: Option<String>,
    registro: RegistroCampos,
    erro_formulario: Option<String>,
    carregando: bool,
    estado: EstadoFormulario,
    ao_definir_dados: Option<CallbackDados>,
    ao_definir_etapa: Option<CallbackEtapa>,
}

impl FormularioProduto {
    pub fn new(config: ConfigFormulario) -> Self {
        let registro = config
            .dados_iniciais
            .as_ref()
            .map(RegistroCampos::a_partir_de)
            .unwrap_or_default();
        let tipo_selecionado = config
            .dados_iniciais
            .as_ref()
            .and_then(|p| p.product_type.as_ref())
            .map(|t| t.name.clone());

        FormularioProduto {
            link_envio: config.link_envio,
            metodo: config.metodo,
            titulo: config.titulo,
            sem_carregamento: config.sem_carregamento,
            opcoes: OpcoesFormulario::from(&config.fontes),
            fontes: config.fontes,
            tipo_selecionado,
            registro,
            erro_formulario: None,
            carregando: false,
            estado: EstadoFormulario::Ocioso,
            ao_definir_dados: None,
            ao_definir_etapa: None,
        }
    }

    /// Recebe os dados validados em vez de enviá-los (fluxos de várias etapas).
    pub fn com_dados_delegados(mut self, callback: impl FnMut(ProdutoValidado) + 'static) -> Self {
        self.ao_definir_dados = Some(Box::new(callback));
        self
    }

    /// Recebe o sinal de etapa após a validação.
    pub fn com_etapa(mut self, callback: impl FnMut(u8) + 'static) -> Self {
        self.ao_definir_etapa = Some(Box::new(callback));
        self
    }

    /// Troca as listas de origem e refaz as opções.
    pub fn atualizar_fontes(&mut self, fontes: FontesOpcoes) {
        self.opcoes = OpcoesFormulario::from(&fontes);
        self.fontes = fontes;
    }

    pub fn fontes(&self) -> &FontesOpcoes {
        &self.fontes
    }

    pub fn opcoes(&self) -> &OpcoesFormulario {
        &self.opcoes
    }

    /// Seleciona o tipo pelo rótulo (o que o campo de seleção informa ao mudar).
    pub fn selecionar_tipo(&mut self, rotulo: Option<&str>) {
        self.tipo_selecionado = rotulo.map(str::to_string);
    }

    /// Seleciona o tipo pelo valor da opção; valores desconhecidos limpam a seleção.
    pub fn selecionar_tipo_por_valor(&mut self, valor: &str) {
        self.tipo_selecionado = self
            .opcoes
            .types
            .iter()
            .find(|opcao| opcao.value == valor)
            .map(|opcao| opcao.label.clone());
    }

    pub fn tipo_selecionado(&self) -> Option<&str> {
        self.tipo_selecionado.as_deref()
    }

    /// Campos exibidos para o tipo atual; diamante e metal só aparecem para joias.
    pub fn campos_visiveis(&self) -> Vec<&'static DescricaoCampo> {
        let joia = self.tipo_selecionado.as_deref() == Some(TIPO_JOIA);
        CAMPOS.iter().filter(|c| joia || !c.somente_joia).collect()
    }

    pub fn registro(&self) -> &RegistroCampos {
        &self.registro
    }

    pub fn erro_formulario(&self) -> Option<&str> {
        self.erro_formulario.as_deref()
    }

    pub fn carregando(&self) -> bool {
        self.carregando
    }

    pub fn estado(&self) -> EstadoFormulario {
        self.estado
    }

    pub fn titulo(&self) -> &str {
        &self.titulo
    }

    pub fn descricao(&self) -> DescricaoFormulario<'_> {
        DescricaoFormulario {
            titulo: &self.titulo,
            tipo_selecionado: self.tipo_selecionado(),
            campos: self.campos_visiveis(),
            opcoes: &self.opcoes,
            valores: self.registro.valores(),
            erros: self.registro.erros(),
            erro_formulario: self.erro_formulario(),
            carregando: self.carregando,
        }
    }

    /// Libera o formulário depois de um envio delegado, para uma nova tentativa.
    pub fn reiniciar(&mut self) {
        if self.estado == EstadoFormulario::Submetendo {
            self.estado = EstadoFormulario::Ocioso;
            self.carregando = false;
        }
    }

    /// Valida e envia os dados.
    pub async fn submeter(
        &mut self,
        dados: DadosFormulario,
        cliente: &dyn HttpClient,
        navegador: &mut dyn Navegador,
    ) -> ResultadoSubmissao {
        if self.estado != EstadoFormulario::Ocioso {
            warn!(estado = ?self.estado, "Envio ignorado: formulário já submetido");
            return ResultadoSubmissao::EmAndamento;
        }

        // Remove o erro anterior e guarda o que foi digitado
        self.erro_formulario = None;
        self.registro.atualizar(&dados);

        let rotulo = match &self.tipo_selecionado {
            Some(rotulo) => rotulo.clone(),
            None => {
                self.erro_formulario = Some(MENSAGEM_TIPO_AUSENTE.to_string());
                return ResultadoSubmissao::TipoAusente;
            }
        };

        let regras = regras_para_tipo(&rotulo);
        self.registro.set_errors(BTreeMap::new());

        let produto = match validar(&dados, regras, OpcoesValidacao { abort_early: false }) {
            Ok(produto) => produto,
            Err(violacoes) => {
                let erros = para_erros(violacoes);
                self.registro.set_errors(erros.clone());
                return ResultadoSubmissao::Invalido(erros);
            }
        };

        // Validação passou
        self.estado = EstadoFormulario::Submetendo;
        if !self.sem_carregamento {
            self.carregando = true;
        }

        let delegado = self.ao_definir_dados.is_some() || self.ao_definir_etapa.is_some();
        if let Some(callback) = self.ao_definir_dados.as_mut() {
            callback(produto.clone());
        }
        if let Some(callback) = self.ao_definir_etapa.as_mut() {
            callback(1);
        }
        if delegado {
            return ResultadoSubmissao::Delegado(produto);
        }

        let metodo = match self.metodo {
            Some(metodo) => metodo,
            None => {
                self.estado = EstadoFormulario::Ocioso;
                self.carregando = false;
                return ResultadoSubmissao::Validado(produto);
            }
        };

        let corpo = match serde_json::to_value(&produto) {
            Ok(corpo) => corpo,
            Err(e) => {
                warn!(erro = %e, "Falha ao serializar produto");
                return self.falhar(MENSAGEM_ERRO_GENERICO.to_string());
            }
        };

        info!(link = %self.link_envio, ?metodo, stock_id = produto.stock_id, "Enviando produto");
        let resposta = match metodo {
            MetodoEnvio::Post => cliente.post(&self.link_envio, &corpo).await,
            MetodoEnvio::Patch => cliente.patch(&self.link_envio, &corpo).await,
        };

        match resposta {
            Ok(_) => {
                self.estado = EstadoFormulario::Concluido;
                navegador.replace(ROTA_LISTAGEM);
                ResultadoSubmissao::Enviado { destino: ROTA_LISTAGEM.to_string() }
            }
            Err(e) => {
                warn!(erro = %e, link = %self.link_envio, "API recusou o produto");
                self.falhar(e.mensagem_exibicao())
            }
        }
    }

    fn falhar(&mut self, mensagem: String) -> ResultadoSubmissao {
        self.erro_formulario = Some(mensagem.clone());
        self.carregando = false;
        self.estado = EstadoFormulario::Ocioso;
        ResultadoSubmissao::FalhaServidor(mensagem)
    }
}

fn para_erros(violacoes: Vec<ViolacaoCampo>) -> ErrosValidacao {
    let mut erros = BTreeMap::new();
    for violacao in violacoes {
        // Mantém a primeira mensagem de cada campo
        erros.entry(violacao.campo).or_insert(violacao.mensagem);
    }
    erros
}
