// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use financeiro_backend::config::AppState;
use financeiro_backend::middleware::auth::auth_guard;
use financeiro_backend::{docs, handlers};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: login é público, o restante exige sessão.
    let auth_publico = Router::new().route("/login", post(handlers::auth::login));
    let auth_protegido = Router::new()
        .route("/me", get(handlers::auth::me))
        .route("/switch-loja", post(handlers::auth::switch_loja))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de negócio, todas atrás do auth_guard. As barras finais nas
    // coleções fazem parte do contrato com o frontend.
    let rotas_financeiro = Router::new()
        .route(
            "/categorias/",
            get(handlers::categorias::listar).post(handlers::categorias::criar),
        )
        .route(
            "/categorias/{id}",
            put(handlers::categorias::atualizar).delete(handlers::categorias::excluir),
        )
        .route("/taxas/perfis/", get(handlers::taxas::listar_perfis))
        .route(
            "/despesas/",
            get(handlers::despesas::listar).post(handlers::despesas::criar),
        )
        .route(
            "/despesas/{id}",
            get(handlers::despesas::buscar)
                .put(handlers::despesas::atualizar)
                .delete(handlers::despesas::excluir),
        )
        .route(
            "/despesas/{id}/status",
            patch(handlers::despesas::mudar_status),
        )
        .route(
            "/fechamento/calcular/{loja_id}/{mes}/{ano}",
            post(handlers::fechamento::calcular),
        )
        .route(
            "/dashboard/resumo/{loja_id}/{mes}/{ano}",
            get(handlers::dashboard::resumo),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest(
            "/api/financeiro",
            Router::new()
                .nest("/auth", auth_publico.merge(auth_protegido))
                .merge(rotas_financeiro),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
