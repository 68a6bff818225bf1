// src/handlers/categorias.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::Sessao,
    models::financeiro::{Categoria, CategoriaPayload},
};

// GET /api/financeiro/categorias/
#[utoipa::path(
    get,
    path = "/api/financeiro/categorias/",
    tag = "Categorias",
    responses((status = 200, description = "Categorias ativas", body = Vec<Categoria>)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Sessao(_sessao): Sessao,
) -> Result<Json<Vec<Categoria>>, AppError> {
    Ok(Json(app_state.categoria_repo.listar_ativas().await?))
}

// POST /api/financeiro/categorias/
#[utoipa::path(
    post,
    path = "/api/financeiro/categorias/",
    tag = "Categorias",
    request_body = CategoriaPayload,
    responses((status = 200, description = "Categoria criada", body = Categoria)),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Json(payload): Json<CategoriaPayload>,
) -> Result<Json<Categoria>, AppError> {
    payload.validate()?;
    app_state
        .auth_service
        .exigir_edicao_na_loja_ativa(&sessao)
        .await?;

    let categoria = app_state
        .categoria_repo
        .criar(&payload.nome, payload.ativa)
        .await?;
    Ok(Json(categoria))
}

// PUT /api/financeiro/categorias/{id}
#[utoipa::path(
    put,
    path = "/api/financeiro/categorias/{id}",
    tag = "Categorias",
    request_body = CategoriaPayload,
    params(("id" = i64, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria atualizada", body = Categoria),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
    Json(payload): Json<CategoriaPayload>,
) -> Result<Json<Categoria>, AppError> {
    payload.validate()?;
    app_state
        .auth_service
        .exigir_edicao_na_loja_ativa(&sessao)
        .await?;

    let categoria = app_state
        .categoria_repo
        .atualizar(id, &payload.nome, payload.ativa)
        .await?
        .ok_or(AppError::NaoEncontrado("Categoria"))?;
    Ok(Json(categoria))
}

// DELETE /api/financeiro/categorias/{id}
// Operação "suave": categoria com despesas vinculadas é desativada em vez de
// removida; sem vínculos, sai de vez.
#[utoipa::path(
    delete,
    path = "/api/financeiro/categorias/{id}",
    tag = "Categorias",
    params(("id" = i64, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria removida ou desativada"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Sessao(sessao): Sessao,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .exigir_edicao_na_loja_ativa(&sessao)
        .await?;

    if !app_state.categoria_repo.existe(id).await? {
        return Err(AppError::NaoEncontrado("Categoria"));
    }

    if app_state.categoria_repo.tem_despesas_vinculadas(id).await? {
        app_state.categoria_repo.desativar(id).await?;
    } else {
        app_state.categoria_repo.excluir(id).await?;
    }

    Ok(Json(json!({ "success": true })))
}
