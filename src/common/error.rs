use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::common::i18n::{I18nStore, Mensagem};
use crate::middleware::i18n::Locale;

// Erros do domínio e da infraestrutura. A conversão para HTTP acontece só na borda (handlers).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Demanda não encontrada: {0}")]
    DemandaNaoEncontrada(String),

    #[error("Período inválido: {0}")]
    PeriodoInvalido(String),

    #[error("Status inválido: {0}")]
    StatusInvalido(String),

    // Falhas de leitura/escrita do arquivo de dados
    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),
}

// O erro que de fato sai pela API, já traduzido para o idioma do cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        match self {
            AppError::ValidationError(errors) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: i18n.get(lang, Mensagem::CamposObrigatorios).to_string(),
                details: Some(validation_details(errors)),
            },
            AppError::DemandaNaoEncontrada(_) => ApiError {
                status: StatusCode::NOT_FOUND,
                message: i18n.get(lang, Mensagem::DemandaNaoEncontrada).to_string(),
                details: None,
            },
            AppError::PeriodoInvalido(valor) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: format!("{}: {}", i18n.get(lang, Mensagem::PeriodoInvalido), valor),
                details: None,
            },
            AppError::StatusInvalido(valor) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: format!("{}: {}", i18n.get(lang, Mensagem::StatusInvalido), valor),
                details: None,
            },
            // Storage e serialização viram 500; o detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: i18n.get(lang, Mensagem::ErroInterno).to_string(),
                    details: None,
                }
            }
        }
    }
}

// Todas as mensagens de cada campo inválido: { "titulo": ["..."], ... }
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    json!(details)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
