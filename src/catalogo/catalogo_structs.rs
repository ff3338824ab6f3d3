// src/catalogo/catalogo_structs.rs

use serde::{Deserialize, Serialize};

/// Entidade do catálogo como devolvida pela API (pedra, formato, tipo ou metal).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntidadeCatalogo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl EntidadeCatalogo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        EntidadeCatalogo { id: id.into(), name: name.into() }
    }
}

/// Opção normalizada para um campo de seleção.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct OpcaoSelect {
    pub value: String,
    pub label: String,
}

impl From<&EntidadeCatalogo> for OpcaoSelect {
    fn from(entidade: &EntidadeCatalogo) -> Self {
        OpcaoSelect {
            value: entidade.id.clone(),
            label: entidade.name.clone(),
        }
    }
}

/// Projeta as entidades em opções, mantendo a ordem recebida.
pub fn projetar_opcoes(entidades: &[EntidadeCatalogo]) -> Vec<OpcaoSelect> {
    entidades.iter().map(OpcaoSelect::from).collect()
}

/// As quatro listas de origem usadas pelo formulário de produto.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FontesOpcoes {
    pub stones: Vec<EntidadeCatalogo>,
    pub shapes: Vec<EntidadeCatalogo>,
    pub types: Vec<EntidadeCatalogo>,
    pub metals: Vec<EntidadeCatalogo>,
}

/// As quatro listas já projetadas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpcoesFormulario {
    pub stones: Vec<OpcaoSelect>,
    pub shapes: Vec<OpcaoSelect>,
    pub types: Vec<OpcaoSelect>,
    pub metals: Vec<OpcaoSelect>,
}

impl From<&FontesOpcoes> for OpcoesFormulario {
    fn from(fontes: &FontesOpcoes) -> Self {
        OpcoesFormulario {
            stones: projetar_opcoes(&fontes.stones),
            shapes: projetar_opcoes(&fontes.shapes),
            types: projetar_opcoes(&fontes.types),
            metals: projetar_opcoes(&fontes.metals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pedras() -> Vec<EntidadeCatalogo> {
        vec![
            EntidadeCatalogo::new("p1", "Esmeralda"),
            EntidadeCatalogo::new("p2", "Rubi"),
            EntidadeCatalogo::new("p3", "Safira"),
        ]
    }

    #[test]
    fn projecao_mapeia_id_e_nome() {
        let opcoes = projetar_opcoes(&pedras());
        assert_eq!(opcoes[1], OpcaoSelect { value: "p2".into(), label: "Rubi".into() });
    }

    #[test]
    fn projecao_repetida_e_identica() {
        let fonte = pedras();
        let primeira = projetar_opcoes(&fonte);
        let segunda = projetar_opcoes(&fonte);
        assert_eq!(primeira, segunda);
        assert_eq!(segunda.len(), 3);
        let rotulos: Vec<_> = segunda.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(rotulos, ["Esmeralda", "Rubi", "Safira"]);
    }

    #[test]
    fn entidade_usa_campo_id_da_api() {
        let entidade: EntidadeCatalogo =
            serde_json::from_value(serde_json::json!({ "_id": "t1", "name": "Joia" })).unwrap();
        assert_eq!(entidade, EntidadeCatalogo::new("t1", "Joia"));
    }
}
