// src/db/usuario_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{GrupoOut, LojaOut, PapelAcesso, Usuario},
};

// Repositório de usuários, grupos/lojas acessíveis e dispositivos liberados.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct GrupoRow {
    id: i64,
    nome: String,
    papel: PapelAcesso,
}

#[derive(sqlx::FromRow)]
struct LojaRow {
    grupo_id: i64,
    id: i64,
    nome: String,
    papel: PapelAcesso,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let maybe = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, username, nome, email, senha_hash, criado_em
            FROM usuarios
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Usuario>, AppError> {
        let maybe = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, username, nome, email, senha_hash, criado_em
            FROM usuarios
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Grupos do usuário com as lojas aninhadas, na ordem cadastrada.
    pub async fn grupos_do_usuario(&self, usuario_id: i64) -> Result<Vec<GrupoOut>, AppError> {
        let grupos = sqlx::query_as::<_, GrupoRow>(
            r#"
            SELECT g.id, g.nome, ug.papel
            FROM grupos g
            JOIN usuario_grupos ug ON ug.grupo_id = g.id
            WHERE ug.usuario_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        let lojas = sqlx::query_as::<_, LojaRow>(
            r#"
            SELECT l.grupo_id, l.id, l.nome, ul.papel
            FROM lojas l
            JOIN usuario_lojas ul ON ul.loja_id = l.id
            WHERE ul.usuario_id = $1
            ORDER BY l.grupo_id, l.ordem, l.id
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        let montados = grupos
            .into_iter()
            .map(|g| {
                let lojas_do_grupo = lojas
                    .iter()
                    .filter(|l| l.grupo_id == g.id)
                    .map(|l| LojaOut {
                        id: l.id,
                        nome: l.nome.clone(),
                        papel: l.papel,
                    })
                    .collect();
                GrupoOut {
                    id: g.id,
                    nome: g.nome,
                    papel: g.papel,
                    lojas: lojas_do_grupo,
                }
            })
            .collect();

        Ok(montados)
    }

    /// A loja com o papel do usuário nela, se ele tiver acesso.
    pub async fn loja_acessivel(
        &self,
        usuario_id: i64,
        loja_id: i64,
    ) -> Result<Option<LojaOut>, AppError> {
        let maybe = sqlx::query_as::<_, LojaOut>(
            r#"
            SELECT l.id, l.nome, ul.papel
            FROM lojas l
            JOIN usuario_lojas ul ON ul.loja_id = l.id
            WHERE ul.usuario_id = $1 AND l.id = $2
            "#,
        )
        .bind(usuario_id)
        .bind(loja_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Loja ativa padrão no login: a primeira loja do primeiro grupo.
    pub async fn primeira_loja(&self, usuario_id: i64) -> Result<Option<i64>, AppError> {
        let maybe = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT l.id
            FROM lojas l
            JOIN usuario_lojas ul ON ul.loja_id = l.id
            WHERE ul.usuario_id = $1
            ORDER BY l.grupo_id, l.ordem, l.id
            LIMIT 1
            "#,
        )
        .bind(usuario_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Um dispositivo desconhecido equivale a um não liberado.
    pub async fn dispositivo_liberado(&self, dispositivo_id: Uuid) -> Result<bool, AppError> {
        let liberado = sqlx::query_scalar::<_, bool>(
            "SELECT liberado FROM dispositivos_autorizados WHERE id = $1",
        )
        .bind(dispositivo_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(liberado.unwrap_or(false))
    }
}
