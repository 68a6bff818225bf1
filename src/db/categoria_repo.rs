// src/db/categoria_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::financeiro::Categoria};

#[derive(Clone)]
pub struct CategoriaRepository {
    pool: PgPool,
}

impl CategoriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar_ativas(&self) -> Result<Vec<Categoria>, AppError> {
        let categorias = sqlx::query_as::<_, Categoria>(
            "SELECT id, nome, ativa FROM categorias_despesa WHERE ativa = true ORDER BY nome ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }

    pub async fn buscar(&self, id: i64) -> Result<Option<Categoria>, AppError> {
        let maybe = sqlx::query_as::<_, Categoria>(
            "SELECT id, nome, ativa FROM categorias_despesa WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Categorias referenciadas por um conjunto de despesas (inclui inativas,
    /// que continuam aparecendo nas despesas antigas).
    pub async fn buscar_por_ids(&self, ids: &[i64]) -> Result<Vec<Categoria>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let categorias = sqlx::query_as::<_, Categoria>(
            "SELECT id, nome, ativa FROM categorias_despesa WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }

    pub async fn existe(&self, id: i64) -> Result<bool, AppError> {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM categorias_despesa WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn criar(&self, nome: &str, ativa: bool) -> Result<Categoria, AppError> {
        let categoria = sqlx::query_as::<_, Categoria>(
            r#"
            INSERT INTO categorias_despesa (nome, ativa)
            VALUES ($1, $2)
            RETURNING id, nome, ativa
            "#,
        )
        .bind(nome)
        .bind(ativa)
        .fetch_one(&self.pool)
        .await?;
        Ok(categoria)
    }

    pub async fn atualizar(
        &self,
        id: i64,
        nome: &str,
        ativa: bool,
    ) -> Result<Option<Categoria>, AppError> {
        let maybe = sqlx::query_as::<_, Categoria>(
            r#"
            UPDATE categorias_despesa
            SET nome = $2, ativa = $3
            WHERE id = $1
            RETURNING id, nome, ativa
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(ativa)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn tem_despesas_vinculadas(&self, id: i64) -> Result<bool, AppError> {
        let tem = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM despesas WHERE categoria_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(tem)
    }

    pub async fn desativar(&self, id: i64) -> Result<u64, AppError> {
        let resultado = sqlx::query("UPDATE categorias_despesa SET ativa = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn excluir(&self, id: i64) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM categorias_despesa WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}
