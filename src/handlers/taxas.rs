// src/handlers/taxas.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::Sessao,
    models::financeiro::{PerfilTaxaOut, TaxaItemOut},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PerfisTaxaQuery {
    pub loja_id: Option<i64>,
}

// GET /api/financeiro/taxas/perfis/
#[utoipa::path(
    get,
    path = "/api/financeiro/taxas/perfis/",
    tag = "Taxas",
    params(PerfisTaxaQuery),
    responses((status = 200, description = "Perfis de taxa ativos com seus itens", body = Vec<PerfilTaxaOut>)),
    security(("api_jwt" = []))
)]
pub async fn listar_perfis(
    State(app_state): State<AppState>,
    Sessao(_sessao): Sessao,
    Query(query): Query<PerfisTaxaQuery>,
) -> Result<Json<Vec<PerfilTaxaOut>>, AppError> {
    let perfis = app_state.taxa_repo.listar_perfis(query.loja_id).await?;

    let ids: Vec<i64> = perfis.iter().map(|p| p.id).collect();
    let itens = if ids.is_empty() {
        Vec::new()
    } else {
        app_state.taxa_repo.itens_dos_perfis(&ids).await?
    };

    let resposta = perfis
        .into_iter()
        .map(|perfil| {
            let taxas = itens
                .iter()
                .filter(|t| t.perfil_id == perfil.id)
                .map(TaxaItemOut::from)
                .collect();
            PerfilTaxaOut {
                id: perfil.id,
                nome: perfil.nome,
                loja_id: perfil.loja_id,
                data_inicio_vigencia: perfil.data_inicio_vigencia,
                ativo: perfil.ativo,
                taxas,
            }
        })
        .collect();

    Ok(Json(resposta))
}
