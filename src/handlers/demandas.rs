// src/handlers/demandas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, format::hoje, i18n::Mensagem},
    config::AppState,
    middleware::{i18n::Locale, json::JsonBody},
    models::{
        common::Notificacao,
        demanda::{
            AtualizarStatusPayload, DemandaAtualizada, DemandaCriada, DetalheDemanda,
            EditarDemandaPayload, FiltroDemandas, NovaDemandaPayload, PaginaDemandas,
            StatusAtualizado,
        },
    },
};

// GET /api/demandas
#[utoipa::path(
    get,
    path = "/api/demandas",
    tag = "Demandas",
    params(FiltroDemandas),
    responses(
        (status = 200, description = "Página de demandas filtradas (5 por página)", body = PaginaDemandas)
    )
)]
pub async fn list_demandas(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<FiltroDemandas>,
) -> Result<impl IntoResponse, ApiError> {
    let mut pagina = app_state.demanda_service.listar(&filtro).await;

    if pagina.mensagem.is_some() {
        pagina.mensagem = Some(
            app_state
                .i18n_store
                .get(&locale.0, Mensagem::NenhumaDemandaEncontrada)
                .to_string(),
        );
    }

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/demandas/{id}
#[utoipa::path(
    get,
    path = "/api/demandas/{id}",
    tag = "Demandas",
    params(
        ("id" = String, Path, description = "ID da demanda", example = "001")
    ),
    responses(
        (status = 200, description = "Detalhes da demanda", body = DetalheDemanda),
        (status = 404, description = "Demanda não encontrada")
    )
)]
pub async fn get_demanda(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detalhe = app_state
        .demanda_service
        .detalhar(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detalhe)))
}

// POST /api/demandas
#[utoipa::path(
    post,
    path = "/api/demandas",
    tag = "Demandas",
    request_body = NovaDemandaPayload,
    responses(
        (status = 201, description = "Demanda registrada", body = DemandaCriada),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos"),
        (status = 422, description = "Corpo JSON em formato inesperado")
    )
)]
pub async fn create_demanda(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<NovaDemandaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let demanda = app_state
        .demanda_service
        .criar(payload, hoje())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let notificacao = Notificacao::sucesso(app_state.i18n_store.get(&locale.0, Mensagem::DemandaRegistrada));

    Ok((StatusCode::CREATED, Json(DemandaCriada { demanda, notificacao })))
}

// PUT /api/demandas/{id}
#[utoipa::path(
    put,
    path = "/api/demandas/{id}",
    tag = "Demandas",
    request_body = EditarDemandaPayload,
    params(
        ("id" = String, Path, description = "ID da demanda", example = "006")
    ),
    responses(
        (status = 200, description = "Demanda atualizada", body = DemandaAtualizada),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos"),
        (status = 404, description = "Demanda não encontrada")
    )
)]
pub async fn update_demanda(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<EditarDemandaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let demanda = app_state
        .demanda_service
        .editar(&id, payload, hoje())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let notificacao = Notificacao::sucesso(app_state.i18n_store.get(&locale.0, Mensagem::DemandaAtualizada));

    Ok((StatusCode::OK, Json(DemandaAtualizada { demanda, notificacao })))
}

// PATCH /api/demandas/{id}/status
#[utoipa::path(
    patch,
    path = "/api/demandas/{id}/status",
    tag = "Demandas",
    request_body = AtualizarStatusPayload,
    params(
        ("id" = String, Path, description = "ID da demanda", example = "001")
    ),
    responses(
        (status = 200, description = "Status alterado", body = StatusAtualizado),
        (status = 400, description = "Status fora da lista conhecida"),
        (status = 404, description = "Demanda não encontrada")
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AtualizarStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let demanda = app_state
        .demanda_service
        .atualizar_status(&id, &payload.status, hoje())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let notificacao = Notificacao::sucesso(app_state.i18n_store.get(&locale.0, Mensagem::StatusAtualizado));

    Ok((StatusCode::OK, Json(StatusAtualizado { demanda, notificacao })))
}
