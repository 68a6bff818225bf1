// src/db/taxa_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::financeiro::{PerfilTaxa, TaxaItem},
};

#[derive(Clone)]
pub struct TaxaRepository {
    pool: PgPool,
}

impl TaxaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Perfis ativos, opcionalmente filtrados por loja.
    pub async fn listar_perfis(&self, loja_id: Option<i64>) -> Result<Vec<PerfilTaxa>, AppError> {
        let perfis = sqlx::query_as::<_, PerfilTaxa>(
            r#"
            SELECT id, nome, loja_id, data_inicio_vigencia, ativo
            FROM perfis_taxa
            WHERE ativo = true
              AND ($1::bigint IS NULL OR loja_id = $1)
            ORDER BY data_inicio_vigencia DESC, id
            "#,
        )
        .bind(loja_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(perfis)
    }

    /// Itens de taxa dos perfis informados, na ordem do cadastro.
    pub async fn itens_dos_perfis(&self, perfil_ids: &[i64]) -> Result<Vec<TaxaItem>, AppError> {
        let itens = sqlx::query_as::<_, TaxaItem>(
            r#"
            SELECT id, perfil_id, modalidade, bandeira,
                   parcela_inicial, parcela_final,
                   taxa_percentual, taxa_fixa, dias_para_recebimento
            FROM taxas_maquininha
            WHERE perfil_id = ANY($1)
            ORDER BY perfil_id, id
            "#,
        )
        .bind(perfil_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }

    /// Todas as taxas dos perfis ativos de uma loja, para o cálculo de
    /// fechamento.
    pub async fn taxas_vigentes_da_loja(&self, loja_id: i64) -> Result<Vec<TaxaItem>, AppError> {
        let itens = sqlx::query_as::<_, TaxaItem>(
            r#"
            SELECT t.id, t.perfil_id, t.modalidade, t.bandeira,
                   t.parcela_inicial, t.parcela_final,
                   t.taxa_percentual, t.taxa_fixa, t.dias_para_recebimento
            FROM taxas_maquininha t
            JOIN perfis_taxa p ON p.id = t.perfil_id
            WHERE p.loja_id = $1 AND p.ativo = true
            ORDER BY t.id
            "#,
        )
        .bind(loja_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }
}
