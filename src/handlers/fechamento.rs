// src/handlers/fechamento.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    config::AppState,
    middleware::auth::Sessao,
    models::{financeiro::FechamentoOut, periodo::Periodo},
};

// POST /api/financeiro/fechamento/calcular/{loja_id}/{mes}/{ano}
// Recalcula e persiste o fechamento do período; um período FECHADO é
// devolvido como está, sem recálculo.
#[utoipa::path(
    post,
    path = "/api/financeiro/fechamento/calcular/{loja_id}/{mes}/{ano}",
    tag = "Fechamento",
    params(
        ("loja_id" = i64, Path, description = "ID da loja"),
        ("mes" = u32, Path, description = "Mês da competência (1-12)"),
        ("ano" = i32, Path, description = "Ano da competência")
    ),
    responses(
        (status = 200, description = "Fechamento calculado", body = FechamentoOut),
        (status = 400, description = "Período inválido"),
        (status = 403, description = "Loja fora da sessão ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn calcular(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path((loja_id, mes, ano)): Path<(i64, u32, i32)>,
) -> Result<Json<FechamentoOut>, AppError> {
    let periodo = Periodo::novo(mes, ano)?;
    app_state
        .auth_service
        .exigir_acesso_loja(&sessao, loja_id, false)
        .await?;

    let fechamento = app_state
        .fechamento_service
        .calcular(EscopoConsulta::new(loja_id, periodo))
        .await?;

    Ok(Json(FechamentoOut::from(&fechamento)))
}
