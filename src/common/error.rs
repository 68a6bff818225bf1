use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::periodo::ErroPeriodo;

// Taxonomia de erros do serviço. Cada variante conhece seu status HTTP;
// detalhes internos ficam no log, nunca no corpo da resposta.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo inválido: {0}")]
    CampoInvalido(String),

    #[error("Status de despesa inválido: {0}")]
    StatusInvalido(String),

    #[error(transparent)]
    PeriodoInvalido(#[from] ErroPeriodo),

    #[error("Período {mes:02}/{ano} já fechado")]
    PeriodoFechado { mes: u32, ano: i32 },

    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Dispositivo não autorizado")]
    DispositivoNaoAutorizado,

    #[error("Token inválido")]
    TokenInvalido,

    #[error("Acesso negado à loja {0}")]
    AcessoNegadoLoja(i64),

    #[error("Perfil somente leitura na loja ativa")]
    SomenteLeitura,

    #[error("{0} não encontrado(a)")]
    NaoEncontrado(&'static str),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // O frontend diferencia esta falha da credencial inválida pelo `code`.
            AppError::DispositivoNaoAutorizado => {
                let body = Json(json!({
                    "error": "Dispositivo não liberado pelo administrador global.",
                    "code": "FORBIDDEN_DEVICE",
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }

            AppError::CampoInvalido(msg) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
            }
            AppError::StatusInvalido(valor) => {
                let body = Json(json!({
                    "error": format!("Status inválido: {valor}. Use PREVISTO, PAGO, ATRASADO ou CANCELADO."),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::PeriodoInvalido(e) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response();
            }
            AppError::PeriodoFechado { mes, ano } => {
                let body = Json(json!({
                    "error": format!("O período {mes:02}/{ano} já foi fechado e não aceita alterações."),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::AcessoNegadoLoja(loja_id) => {
                let body = Json(json!({
                    "error": format!("Acesso negado à loja {loja_id}."),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::NaoEncontrado(recurso) => {
                let body = Json(json!({ "error": format!("{recurso} não encontrado(a).") }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }

            AppError::CredenciaisInvalidas => (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos."),
            AppError::TokenInvalido => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::SomenteLeitura => (StatusCode::FORBIDDEN, "Seu perfil na loja ativa é somente leitura."),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` registra a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
