// Financeiro multi-loja: API REST de despesas, fechamento mensal e resumo
// de saúde financeira, escopada por (loja, mês, ano).
//
// O binário em main.rs monta o router; os módulos ficam públicos para que o
// contrato de domínio (período, escopo de consulta, cálculo de fechamento)
// possa ser usado e testado como biblioteca.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
