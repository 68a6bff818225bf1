// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::switch_loja,

        // --- Categorias ---
        handlers::categorias::listar,
        handlers::categorias::criar,
        handlers::categorias::atualizar,
        handlers::categorias::excluir,

        // --- Taxas ---
        handlers::taxas::listar_perfis,

        // --- Despesas ---
        handlers::despesas::listar,
        handlers::despesas::buscar,
        handlers::despesas::criar,
        handlers::despesas::atualizar,
        handlers::despesas::mudar_status,
        handlers::despesas::excluir,

        // --- Fechamento ---
        handlers::fechamento::calcular,

        // --- Dashboard ---
        handlers::dashboard::resumo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::PapelAcesso,
            models::auth::UsuarioOut,
            models::auth::LojaOut,
            models::auth::GrupoOut,
            models::auth::MeResponse,
            models::auth::SwitchLojaResponse,
            models::auth::LoginPayload,
            models::auth::SwitchLojaPayload,
            models::auth::AuthResponse,

            // --- Financeiro ---
            models::financeiro::StatusDespesa,
            models::financeiro::StatusFechamento,
            models::financeiro::ModalidadePagamento,
            models::financeiro::SaudeFinanceira,
            models::financeiro::Categoria,
            models::financeiro::CategoriaPayload,
            models::financeiro::TaxaItemOut,
            models::financeiro::PerfilTaxaOut,
            models::financeiro::CategoriaResumo,
            models::financeiro::DespesaOut,
            models::financeiro::DespesaDetalheOut,
            models::financeiro::DespesaPayload,
            models::financeiro::StatusPayload,
            models::financeiro::FechamentoOut,
            models::financeiro::DashboardResumo,

            // --- Período ---
            models::periodo::Periodo,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, sessão e troca de loja ativa"),
        (name = "Categorias", description = "Cadastro de categorias de despesa"),
        (name = "Taxas", description = "Perfis de taxa de cartão por loja"),
        (name = "Despesas", description = "Contas a pagar por loja e competência"),
        (name = "Fechamento", description = "Fechamento mensal por loja"),
        (name = "Dashboard", description = "Resumo de saúde financeira do período")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
