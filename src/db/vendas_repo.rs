// src/db/vendas_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    models::financeiro::FaturamentoItem,
    services::fechamento_service::ProvedorFaturamento,
};

/// Leitura da réplica local dos agregados do sistema de vendas. O serviço
/// financeiro nunca escreve nesta tabela; a carga é externa.
#[derive(Clone)]
pub struct VendasRepository {
    pool: PgPool,
}

impl VendasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProvedorFaturamento for VendasRepository {
    async fn faturamento_por_loja(
        &self,
        escopo: EscopoConsulta,
    ) -> Result<Vec<FaturamentoItem>, AppError> {
        let itens = sqlx::query_as::<_, FaturamentoItem>(
            r#"
            SELECT tipo_pagamento, bandeira, parcelas,
                   COALESCE(SUM(valor_bruto), 0) AS valor_bruto
            FROM vendas
            WHERE loja_id = $1 AND mes = $2 AND ano = $3
            GROUP BY tipo_pagamento, bandeira, parcelas
            ORDER BY tipo_pagamento, bandeira, parcelas
            "#,
        )
        .bind(escopo.loja_id)
        .bind(escopo.periodo.mes as i32)
        .bind(escopo.periodo.ano)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }
}
