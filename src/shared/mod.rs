// src/shared/mod.rs

// Estruturas de resposta compartilhadas entre as rotas
pub mod shared_structs;
// Cliente HTTP para a API do catálogo
pub mod api_client;
