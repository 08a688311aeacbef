// src/models/common.rs

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipoNotificacao {
    Sucesso,
    Erro,
}

// Mensagem curta (toast) que acompanha o resultado de uma ação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notificacao {
    pub mensagem: String,
    pub tipo: TipoNotificacao,
}

impl Notificacao {
    pub fn sucesso(mensagem: impl Into<String>) -> Self {
        Self { mensagem: mensagem.into(), tipo: TipoNotificacao::Sucesso }
    }
}
