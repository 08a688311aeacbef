// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, format::hoje, i18n::Mensagem},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{Dashboard, DemandasCriticas, Graficos, Indicadores, PeriodoQuery},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(PeriodoQuery),
    responses(
        (status = 200, description = "Indicadores, cards, gráficos e demandas críticas", body = Dashboard),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let periodo = query
        .periodo()
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let mut dashboard = app_state.dashboard_service.get_dashboard(periodo, hoje()).await;
    traduzir_criticas(&mut dashboard.criticas, &app_state, &locale);

    Ok((StatusCode::OK, Json(dashboard)))
}

// GET /api/dashboard/indicadores
#[utoipa::path(
    get,
    path = "/api/dashboard/indicadores",
    tag = "Dashboard",
    params(PeriodoQuery),
    responses(
        (status = 200, description = "Indicadores do período atual e do anterior, com variações", body = Indicadores),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn get_indicadores(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let periodo = query
        .periodo()
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let indicadores = app_state.dashboard_service.get_indicadores(periodo, hoje()).await;

    Ok((StatusCode::OK, Json(indicadores)))
}

// GET /api/dashboard/graficos
#[utoipa::path(
    get,
    path = "/api/dashboard/graficos",
    tag = "Dashboard",
    params(PeriodoQuery),
    responses(
        (status = 200, description = "Gráfico por status/categoria, evolução mensal e dados brutos", body = Graficos),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn get_graficos(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let periodo = query
        .periodo()
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let graficos = app_state.dashboard_service.get_graficos(periodo, hoje()).await;

    Ok((StatusCode::OK, Json(graficos)))
}

// GET /api/dashboard/criticas
#[utoipa::path(
    get,
    path = "/api/dashboard/criticas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Até 3 demandas de alta criticidade ainda não encerradas", body = DemandasCriticas)
    )
)]
pub async fn get_criticas(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let mut criticas = app_state.dashboard_service.get_criticas().await;
    traduzir_criticas(&mut criticas, &app_state, &locale);

    Ok((StatusCode::OK, Json(criticas)))
}

fn traduzir_criticas(criticas: &mut DemandasCriticas, app_state: &AppState, locale: &Locale) {
    if criticas.mensagem.is_some() {
        criticas.mensagem = Some(
            app_state
                .i18n_store
                .get(&locale.0, Mensagem::NenhumaDemandaCritica)
                .to_string(),
        );
    }
}
