// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    config::AppState,
    middleware::auth::Sessao,
    models::{financeiro::DashboardResumo, periodo::Periodo},
};

// GET /api/financeiro/dashboard/resumo/{loja_id}/{mes}/{ano}
// Sempre recalculado sob demanda; nada deste resumo é persistido.
#[utoipa::path(
    get,
    path = "/api/financeiro/dashboard/resumo/{loja_id}/{mes}/{ano}",
    tag = "Dashboard",
    params(
        ("loja_id" = i64, Path, description = "ID da loja"),
        ("mes" = u32, Path, description = "Mês da competência (1-12)"),
        ("ano" = i32, Path, description = "Ano da competência")
    ),
    responses(
        (status = 200, description = "Resumo financeiro do período", body = DashboardResumo),
        (status = 400, description = "Período inválido"),
        (status = 403, description = "Loja fora da sessão ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn resumo(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path((loja_id, mes, ano)): Path<(i64, u32, i32)>,
) -> Result<Json<DashboardResumo>, AppError> {
    let periodo = Periodo::novo(mes, ano)?;
    app_state
        .auth_service
        .exigir_acesso_loja(&sessao, loja_id, false)
        .await?;

    let resumo = app_state
        .dashboard_service
        .resumo(EscopoConsulta::new(loja_id, periodo))
        .await?;

    Ok(Json(resumo))
}
