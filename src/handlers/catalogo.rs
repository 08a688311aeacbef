// src/handlers/catalogo.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{config::AppState, models::catalogo::Categoria};

// GET /api/categorias
#[utoipa::path(
    get,
    path = "/api/categorias",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Categorias aceitas no cadastro de demandas", body = Vec<Categoria>)
    )
)]
pub async fn list_categorias(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.catalogo.categorias().to_vec()))
}
