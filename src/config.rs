// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CategoriaRepository, DespesaRepository, FechamentoRepository, TaxaRepository,
        UsuarioRepository, VendasRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService, despesa_service::DespesaService,
        fechamento_service::{FechamentoService, ProvedorFaturamento},
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub categoria_repo: CategoriaRepository,
    pub taxa_repo: TaxaRepository,
    pub despesa_service: DespesaService,
    pub fechamento_service: FechamentoService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let categoria_repo = CategoriaRepository::new(db_pool.clone());
        let taxa_repo = TaxaRepository::new(db_pool.clone());
        let despesa_repo = DespesaRepository::new(db_pool.clone());
        let fechamento_repo = FechamentoRepository::new(db_pool.clone());

        // O faturamento vem do sistema de vendas; em produção, da réplica local.
        let vendas: Arc<dyn ProvedorFaturamento> =
            Arc::new(VendasRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(usuario_repo, jwt_secret.clone());
        let despesa_service = DespesaService::new(
            despesa_repo.clone(),
            categoria_repo.clone(),
            fechamento_repo.clone(),
            auth_service.clone(),
        );
        let fechamento_service = FechamentoService::new(
            fechamento_repo,
            despesa_repo.clone(),
            taxa_repo.clone(),
            vendas,
        );
        let dashboard_service = DashboardService::new(despesa_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            categoria_repo,
            taxa_repo,
            despesa_service,
            fechamento_service,
            dashboard_service,
        })
    }
}
