pub mod auth;
pub mod financeiro;
pub mod periodo;
