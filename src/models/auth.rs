// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Papel de um usuário dentro de um grupo ou de uma loja.
/// LEITURA é o papel somente-leitura: bloqueia toda mutação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "papel_acesso", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PapelAcesso {
    SuperGrupo,
    Gestor,
    Leitura,
}

impl PapelAcesso {
    /// Permissão de edição derivada do papel na loja ativa. Nunca é
    /// armazenada: recalculada a cada requisição.
    pub fn pode_editar(&self) -> bool {
        !matches!(self, PapelAcesso::Leitura)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    pub nome: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub senha_hash: String,

    pub criado_em: DateTime<Utc>,
}

// --- Formas de resposta (nomes de campo idênticos aos do contrato) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsuarioOut {
    pub id: i64,
    pub nome: String,
    pub email: String,
}

impl From<&Usuario> for UsuarioOut {
    fn from(u: &Usuario) -> Self {
        Self {
            id: u.id,
            nome: u.nome.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LojaOut {
    pub id: i64,
    pub nome: String,
    #[serde(rename = "role")]
    pub papel: PapelAcesso,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrupoOut {
    pub id: i64,
    pub nome: String,
    #[serde(rename = "role")]
    pub papel: PapelAcesso,
    pub lojas: Vec<LojaOut>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UsuarioOut,
    pub grupos: Vec<GrupoOut>,
    pub active_loja: Option<LojaOut>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SwitchLojaResponse {
    pub active_loja: LojaOut,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Informe o usuário."))]
    pub username: String,
    #[validate(length(min = 1, message = "Informe a senha."))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchLojaPayload {
    pub loja_id: i64,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT. A loja ativa vive no token:
// trocar de loja emite um token novo (sessão stateless).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub active_loja_id: Option<i64>,
    pub exp: usize,
    pub iat: usize,
}

/// Sessão resolvida a partir do bearer token, injetada nas extensions da
/// requisição pelo auth_guard.
#[derive(Debug, Clone)]
pub struct SessaoAtual {
    pub usuario: Usuario,
    pub active_loja_id: Option<i64>,
}
