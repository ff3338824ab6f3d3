// src/vendas/mod.rs

// Carrinho de compras e métodos de pagamento
pub mod vendas_structs;
// Rotas do carrinho
pub mod vendas_router;
