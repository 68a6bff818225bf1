// src/handlers/despesas.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::Sessao,
    models::{
        financeiro::{DespesaDetalheOut, DespesaOut, DespesaPayload, StatusPayload},
        periodo::Periodo,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarDespesasQuery {
    pub loja_id: i64,
    pub mes: Option<u32>,
    pub ano: Option<i32>,
    /// Alternativa em ISO "YYYY-MM" (o formato do input type="month").
    pub competencia: Option<String>,
}

// GET /api/financeiro/despesas/
#[utoipa::path(
    get,
    path = "/api/financeiro/despesas/",
    tag = "Despesas",
    params(ListarDespesasQuery),
    responses(
        (status = 200, description = "Despesas da loja, com sinalizadores de vencimento", body = Vec<DespesaOut>),
        (status = 403, description = "Loja fora da sessão ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Query(query): Query<ListarDespesasQuery>,
) -> Result<Json<Vec<DespesaOut>>, AppError> {
    // O filtro de competência vale com "YYYY-MM" ou com o par (mês, ano)
    // completo; qualquer outra combinação lista tudo da loja.
    let periodo = match (&query.competencia, query.mes, query.ano) {
        (Some(iso), _, _) => Some(Periodo::parse_iso(iso)?),
        (None, Some(mes), Some(ano)) => Some(Periodo::novo(mes, ano)?),
        _ => None,
    };

    let despesas = app_state
        .despesa_service
        .listar(&sessao, query.loja_id, periodo)
        .await?;
    Ok(Json(despesas))
}

// GET /api/financeiro/despesas/{id}
#[utoipa::path(
    get,
    path = "/api/financeiro/despesas/{id}",
    tag = "Despesas",
    params(("id" = i64, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Detalhe da despesa", body = DespesaDetalheOut),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
) -> Result<Json<DespesaDetalheOut>, AppError> {
    Ok(Json(app_state.despesa_service.buscar(&sessao, id).await?))
}

// POST /api/financeiro/despesas/
#[utoipa::path(
    post,
    path = "/api/financeiro/despesas/",
    tag = "Despesas",
    request_body = DespesaPayload,
    responses(
        (status = 200, description = "Despesa criada com status PREVISTO", body = DespesaOut),
        (status = 400, description = "Validação ou período fechado"),
        (status = 404, description = "Categoria inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Json(payload): Json<DespesaPayload>,
) -> Result<Json<DespesaOut>, AppError> {
    Ok(Json(app_state.despesa_service.criar(&sessao, payload).await?))
}

// PUT /api/financeiro/despesas/{id}
#[utoipa::path(
    put,
    path = "/api/financeiro/despesas/{id}",
    tag = "Despesas",
    request_body = DespesaPayload,
    params(("id" = i64, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa atualizada", body = DespesaOut),
        (status = 400, description = "Validação ou período fechado"),
        (status = 404, description = "Despesa ou categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
    Json(payload): Json<DespesaPayload>,
) -> Result<Json<DespesaOut>, AppError> {
    Ok(Json(
        app_state
            .despesa_service
            .atualizar(&sessao, id, payload)
            .await?,
    ))
}

// PATCH /api/financeiro/despesas/{id}/status
#[utoipa::path(
    patch,
    path = "/api/financeiro/despesas/{id}/status",
    tag = "Despesas",
    request_body = StatusPayload,
    params(("id" = i64, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Status atualizado", body = DespesaOut),
        (status = 400, description = "Status desconhecido ou período fechado"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mudar_status(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<DespesaOut>, AppError> {
    Ok(Json(
        app_state
            .despesa_service
            .mudar_status(&sessao, id, &payload.status)
            .await?,
    ))
}

// DELETE /api/financeiro/despesas/{id}
#[utoipa::path(
    delete,
    path = "/api/financeiro/despesas/{id}",
    tag = "Despesas",
    params(("id" = i64, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa excluída"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.despesa_service.excluir(&sessao, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Despesa {id} excluída."),
    })))
}
