// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::TypedHeader;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::Sessao, dispositivo::DispositivoId},
    models::auth::{AuthResponse, LoginPayload, MeResponse, SwitchLojaPayload, SwitchLojaResponse},
};

// POST /api/financeiro/auth/login
#[utoipa::path(
    post,
    path = "/api/financeiro/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de sessão emitido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Dispositivo não liberado (code FORBIDDEN_DEVICE)")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    dispositivo: Option<TypedHeader<DispositivoId>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login(
            &payload.username,
            &payload.password,
            dispositivo.map(|TypedHeader(d)| d.0),
        )
        .await?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/financeiro/auth/me
#[utoipa::path(
    get,
    path = "/api/financeiro/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário, grupos/lojas e loja ativa", body = MeResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(app_state.auth_service.montar_me(&sessao).await?))
}

// POST /api/financeiro/auth/switch-loja
// O token renovado (com a loja ativa nova) sai no cabeçalho X-New-Token.
#[utoipa::path(
    post,
    path = "/api/financeiro/auth/switch-loja",
    tag = "Auth",
    request_body = SwitchLojaPayload,
    responses(
        (status = 200, description = "Loja ativa trocada", body = SwitchLojaResponse),
        (status = 403, description = "Loja fora do conjunto acessível")
    ),
    security(("api_jwt" = []))
)]
pub async fn switch_loja(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Json(payload): Json<SwitchLojaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (loja, token) = app_state
        .auth_service
        .trocar_loja(&sessao, payload.loja_id)
        .await?;

    Ok((
        StatusCode::OK,
        [("x-new-token", token)],
        Json(SwitchLojaResponse { active_loja: loja }),
    ))
}
