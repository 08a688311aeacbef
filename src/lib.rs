// src/lib.rs

use axum::{
    routing::{get, patch},
    Json, Router,
};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

/// Monta o router completo da aplicação. O `main` e os testes de integração usam o mesmo.
pub fn app(app_state: AppState) -> Router {
    let demandas_routes = Router::new()
        .route("/"
               ,get(handlers::demandas::list_demandas)
               .post(handlers::demandas::create_demanda)
        )
        .route("/{id}"
               ,get(handlers::demandas::get_demanda)
               .put(handlers::demandas::update_demanda)
        )
        .route("/{id}/status"
               ,patch(handlers::demandas::update_status)
        );

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/indicadores", get(handlers::dashboard::get_indicadores))
        .route("/graficos", get(handlers::dashboard::get_graficos))
        .route("/criticas", get(handlers::dashboard::get_criticas));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/categorias", get(handlers::catalogo::list_categorias))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/demandas", demandas_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}
