// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::SessaoAtual};

/// Guarda de autenticação: valida o bearer token, resolve a sessão (usuário
/// + loja ativa) e a injeta nas extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let sessao = app_state.auth_service.validar_token(token).await?;
            request.extensions_mut().insert(sessao);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::TokenInvalido)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
pub struct Sessao(pub SessaoAtual);

impl<S> FromRequestParts<S> for Sessao
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessaoAtual>()
            .cloned()
            .map(Sessao)
            .ok_or(AppError::TokenInvalido)
    }
}
