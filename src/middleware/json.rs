// src/middleware/json.rs

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    common::{error::ApiError, i18n::Mensagem},
    config::AppState,
    middleware::i18n::Locale,
};

// `Json<T>` que, ao rejeitar o corpo, responde no formato `{ "error", "details" }` da API
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let Ok(locale) = Locale::from_request_parts(&mut parts, state).await;
        let req = Request::from_parts(parts, body);

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejeicao_para_api_error(&rejection, &locale, state)),
        }
    }
}

fn rejeicao_para_api_error(rejection: &JsonRejection, locale: &Locale, state: &AppState) -> ApiError {
    tracing::warn!("⚠️ Corpo JSON rejeitado: {}", rejection.body_text());
    ApiError {
        status: rejection.status(),
        message: state.i18n_store.get(&locale.0, Mensagem::CorpoInvalido).to_string(),
        details: Some(json!(rejection.body_text())),
    }
}
