// src/db/fechamento_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    models::financeiro::{Fechamento, StatusFechamento},
};

const COLUNAS: &str = r#"
    id, loja_id, mes, ano,
    faturamento_bruto, total_taxas, receita_liquida,
    total_despesas, resultado_operacional,
    status, dados_auditoria, atualizado_em
"#;

/// Totais calculados de um fechamento, prontos para persistir.
pub struct TotaisFechamento {
    pub faturamento_bruto: Decimal,
    pub total_taxas: Decimal,
    pub receita_liquida: Decimal,
    pub total_despesas: Decimal,
    pub resultado_operacional: Decimal,
}

#[derive(Clone)]
pub struct FechamentoRepository {
    pool: PgPool,
}

impl FechamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn buscar(&self, escopo: EscopoConsulta) -> Result<Option<Fechamento>, AppError> {
        let maybe = sqlx::query_as::<_, Fechamento>(&format!(
            "SELECT {COLUNAS} FROM fechamentos_mensais WHERE loja_id = $1 AND mes = $2 AND ano = $3"
        ))
        .bind(escopo.loja_id)
        .bind(escopo.periodo.mes as i32)
        .bind(escopo.periodo.ano)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Só o status, para o guarda de período fechado nas mutações.
    pub async fn status_do_periodo(
        &self,
        escopo: EscopoConsulta,
    ) -> Result<Option<StatusFechamento>, AppError> {
        let maybe = sqlx::query_scalar::<_, StatusFechamento>(
            "SELECT status FROM fechamentos_mensais WHERE loja_id = $1 AND mes = $2 AND ano = $3",
        )
        .bind(escopo.loja_id)
        .bind(escopo.periodo.mes as i32)
        .bind(escopo.periodo.ano)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Grava o resultado do cálculo, um registro por (loja, mês, ano).
    /// Recalcular um período ABERTO substitui os totais; o status só sai de
    /// ABERTO pelo processo de fechamento, que não passa por aqui.
    pub async fn upsert(
        &self,
        escopo: EscopoConsulta,
        totais: TotaisFechamento,
        snapshot: serde_json::Value,
    ) -> Result<Fechamento, AppError> {
        let fechamento = sqlx::query_as::<_, Fechamento>(&format!(
            r#"
            INSERT INTO fechamentos_mensais (
                loja_id, mes, ano,
                faturamento_bruto, total_taxas, receita_liquida,
                total_despesas, resultado_operacional,
                status, dados_auditoria, atualizado_em
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'ABERTO', $9, now())
            ON CONFLICT (loja_id, mes, ano) DO UPDATE SET
                faturamento_bruto = EXCLUDED.faturamento_bruto,
                total_taxas = EXCLUDED.total_taxas,
                receita_liquida = EXCLUDED.receita_liquida,
                total_despesas = EXCLUDED.total_despesas,
                resultado_operacional = EXCLUDED.resultado_operacional,
                dados_auditoria = EXCLUDED.dados_auditoria,
                atualizado_em = now()
            RETURNING {COLUNAS}
            "#
        ))
        .bind(escopo.loja_id)
        .bind(escopo.periodo.mes as i32)
        .bind(escopo.periodo.ano)
        .bind(totais.faturamento_bruto)
        .bind(totais.total_taxas)
        .bind(totais.receita_liquida)
        .bind(totais.total_despesas)
        .bind(totais.resultado_operacional)
        .bind(snapshot)
        .fetch_one(&self.pool)
        .await?;
        Ok(fechamento)
    }
}
