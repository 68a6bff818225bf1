// src/db/despesa_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    models::{financeiro::{Despesa, StatusDespesa}, periodo::Periodo},
};

const COLUNAS: &str = r#"
    id, descricao, loja_id, categoria_id,
    valor_bruto, valor_desconto, valor_acrescimo, valor_liquido,
    data_competencia, data_vencimento, data_pagamento,
    status, criado_em, criado_por
"#;

/// Campos mutáveis de uma despesa, já validados e com o líquido calculado.
pub struct DadosDespesa<'a> {
    pub descricao: &'a str,
    pub loja_id: i64,
    pub categoria_id: Option<i64>,
    pub valor_bruto: Decimal,
    pub valor_desconto: Decimal,
    pub valor_acrescimo: Decimal,
    pub valor_liquido: Decimal,
    pub data_competencia: chrono::NaiveDate,
    pub data_vencimento: chrono::NaiveDate,
}

#[derive(Clone)]
pub struct DespesaRepository {
    pool: PgPool,
}

impl DespesaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista por loja, opcionalmente restrita a uma competência (mês, ano).
    pub async fn listar(
        &self,
        loja_id: i64,
        periodo: Option<Periodo>,
    ) -> Result<Vec<Despesa>, AppError> {
        let (mes, ano) = match periodo {
            Some(p) => (Some(p.mes as i32), Some(p.ano)),
            None => (None, None),
        };

        let despesas = sqlx::query_as::<_, Despesa>(&format!(
            r#"
            SELECT {COLUNAS}
            FROM despesas
            WHERE loja_id = $1
              AND ($2::int IS NULL OR (
                    EXTRACT(MONTH FROM data_competencia)::int = $2
                AND EXTRACT(YEAR FROM data_competencia)::int = $3))
            ORDER BY data_vencimento ASC, id ASC
            "#
        ))
        .bind(loja_id)
        .bind(mes)
        .bind(ano)
        .fetch_all(&self.pool)
        .await?;
        Ok(despesas)
    }

    pub async fn buscar(&self, id: i64) -> Result<Option<Despesa>, AppError> {
        let maybe = sqlx::query_as::<_, Despesa>(&format!(
            "SELECT {COLUNAS} FROM despesas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Toda despesa nasce PREVISTO.
    pub async fn criar(
        &self,
        dados: DadosDespesa<'_>,
        criado_por: Option<i64>,
    ) -> Result<Despesa, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>(&format!(
            r#"
            INSERT INTO despesas (
                descricao, loja_id, categoria_id,
                valor_bruto, valor_desconto, valor_acrescimo, valor_liquido,
                data_competencia, data_vencimento, criado_por
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(dados.descricao)
        .bind(dados.loja_id)
        .bind(dados.categoria_id)
        .bind(dados.valor_bruto)
        .bind(dados.valor_desconto)
        .bind(dados.valor_acrescimo)
        .bind(dados.valor_liquido)
        .bind(dados.data_competencia)
        .bind(dados.data_vencimento)
        .bind(criado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(despesa)
    }

    /// Substituição completa dos campos mutáveis (o status não muda aqui).
    pub async fn atualizar(
        &self,
        id: i64,
        dados: DadosDespesa<'_>,
    ) -> Result<Option<Despesa>, AppError> {
        let maybe = sqlx::query_as::<_, Despesa>(&format!(
            r#"
            UPDATE despesas
            SET descricao = $2, loja_id = $3, categoria_id = $4,
                valor_bruto = $5, valor_desconto = $6, valor_acrescimo = $7,
                valor_liquido = $8, data_competencia = $9, data_vencimento = $10
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(dados.descricao)
        .bind(dados.loja_id)
        .bind(dados.categoria_id)
        .bind(dados.valor_bruto)
        .bind(dados.valor_desconto)
        .bind(dados.valor_acrescimo)
        .bind(dados.valor_liquido)
        .bind(dados.data_competencia)
        .bind(dados.data_vencimento)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn atualizar_status(
        &self,
        id: i64,
        status: StatusDespesa,
    ) -> Result<Option<Despesa>, AppError> {
        let maybe = sqlx::query_as::<_, Despesa>(&format!(
            r#"
            UPDATE despesas
            SET status = $2
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Exclusão definitiva. O chamador decide o que fazer com 0 linhas.
    pub async fn excluir(&self, id: i64) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM despesas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    /// Soma do líquido das despesas não canceladas na competência do escopo.
    pub async fn somar_competencia(&self, escopo: EscopoConsulta) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(valor_liquido), 0)
            FROM despesas
            WHERE loja_id = $1
              AND EXTRACT(MONTH FROM data_competencia)::int = $2
              AND EXTRACT(YEAR FROM data_competencia)::int = $3
              AND status <> 'CANCELADO'
            "#,
        )
        .bind(escopo.loja_id)
        .bind(escopo.periodo.mes as i32)
        .bind(escopo.periodo.ano)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
