pub mod auth;
pub mod dashboard_service;
pub mod despesa_service;
pub mod fechamento_service;
