pub mod auth;
pub mod categorias;
pub mod dashboard;
pub mod despesas;
pub mod fechamento;
pub mod taxas;
