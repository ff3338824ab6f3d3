// src/produtos/mod.rs

// Structs do produto (registro da API, dados do formulário, payload validado)
pub mod produtos_structs;
// Conjuntos de regras e validador de campos
pub mod validacao;
// Formulário de cadastro/edição
pub mod formulario;
// Tabela de produtos e confirmação de exclusão
pub mod listagem;
// Rotas do backoffice de produtos
pub mod produtos_router;
