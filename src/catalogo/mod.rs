// src/catalogo/mod.rs

// Entidades do catálogo e projeção em opções de seleção
pub mod catalogo_structs;
// Rotas e carregamento das listas de opções
pub mod catalogo_router;
