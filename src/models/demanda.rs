// src/models/demanda.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::common::Notificacao;

// --- ENUMS ---

// Ciclo de vida da demanda. Valores fora do conjunto fechado são preservados como vieram
// do armazenamento, mas não têm rótulo nem classe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DemandaStatus {
    Aberta,
    EmAnalise,
    EmAndamento,
    AguardandoTerceiros,
    Resolvida,
    Cancelada,
    Desconhecido(String),
}

impl DemandaStatus {
    pub fn parse(codigo: &str) -> Option<Self> {
        match codigo {
            "aberta" => Some(Self::Aberta),
            "em-analise" => Some(Self::EmAnalise),
            "em-andamento" => Some(Self::EmAndamento),
            "aguardando-terceiros" => Some(Self::AguardandoTerceiros),
            "resolvida" => Some(Self::Resolvida),
            "cancelada" => Some(Self::Cancelada),
            _ => None,
        }
    }

    pub fn codigo(&self) -> &str {
        match self {
            Self::Aberta => "aberta",
            Self::EmAnalise => "em-analise",
            Self::EmAndamento => "em-andamento",
            Self::AguardandoTerceiros => "aguardando-terceiros",
            Self::Resolvida => "resolvida",
            Self::Cancelada => "cancelada",
            Self::Desconhecido(codigo) => codigo,
        }
    }

    /// Conta como "aberta" nos indicadores do dashboard.
    pub fn is_aberta(&self) -> bool {
        matches!(
            self,
            Self::Aberta | Self::EmAnalise | Self::EmAndamento | Self::AguardandoTerceiros
        )
    }

    pub fn is_encerrada(&self) -> bool {
        matches!(self, Self::Resolvida | Self::Cancelada)
    }
}

impl From<String> for DemandaStatus {
    fn from(codigo: String) -> Self {
        Self::parse(&codigo).unwrap_or(Self::Desconhecido(codigo))
    }
}

impl From<DemandaStatus> for String {
    fn from(status: DemandaStatus) -> Self {
        match status {
            DemandaStatus::Desconhecido(codigo) => codigo,
            outro => outro.codigo().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Criticidade {
    Baixa,
    Media,
    Alta,
    Desconhecida(String),
}

impl Criticidade {
    pub fn parse(codigo: &str) -> Option<Self> {
        match codigo {
            "baixa" => Some(Self::Baixa),
            "media" => Some(Self::Media),
            "alta" => Some(Self::Alta),
            _ => None,
        }
    }

    pub fn codigo(&self) -> &str {
        match self {
            Self::Baixa => "baixa",
            Self::Media => "media",
            Self::Alta => "alta",
            Self::Desconhecida(codigo) => codigo,
        }
    }
}

impl From<String> for Criticidade {
    fn from(codigo: String) -> Self {
        Self::parse(&codigo).unwrap_or(Self::Desconhecida(codigo))
    }
}

impl From<Criticidade> for String {
    fn from(criticidade: Criticidade) -> Self {
        match criticidade {
            Criticidade::Desconhecida(codigo) => codigo,
            outra => outra.codigo().to_string(),
        }
    }
}

// --- REGISTRO PERSISTIDO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Demanda {
    #[schema(example = "001")]
    pub id: String,
    #[schema(example = "Lâmpadas queimadas no corredor")]
    pub titulo: String,
    #[schema(example = "eletrica")]
    pub categoria: String,
    #[schema(example = "Elétrica")]
    pub categoria_label: String,
    pub data: NaiveDate,
    #[schema(value_type = String, example = "media")]
    pub criticidade: Criticidade,
    #[schema(value_type = String, example = "em-andamento")]
    pub status: DemandaStatus,
    pub descricao: String,
    pub localizacao: String,
    // 0 = custo ainda não definido
    #[serde(default)]
    #[schema(value_type = f64, example = 150.0)]
    pub custo: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_resolucao: Option<NaiveDate>,
}

// --- LISTAGEM ---

// Query string da listagem. Campos vazios (ou as opções "Todos os ...") não filtram.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FiltroDemandas {
    #[param(example = "em-andamento")]
    pub status: Option<String>,
    #[param(example = "eletrica")]
    pub categoria: Option<String>,
    #[param(example = "alta")]
    pub criticidade: Option<String>,
    /// Busca por trecho do título ou do ID (sem diferenciar maiúsculas)
    pub busca: Option<String>,
    #[param(example = 1)]
    pub pagina: Option<u32>,
}

/// Uma linha da lista de demandas (e da lista de críticas do dashboard).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDemanda {
    pub id: String,
    pub titulo: String,
    pub categoria_label: String,
    #[schema(example = "01/04/2025")]
    pub data: String,
    pub criticidade_label: Option<String>,
    pub criticidade_classe: Option<String>,
    pub status_label: Option<String>,
    pub status_classe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginacao {
    pub pagina_atual: u32,
    pub total_paginas: u32,
    pub total_itens: usize,
    pub itens_por_pagina: usize,
    pub anterior_desabilitado: bool,
    pub proxima_desabilitado: bool,
    // Botões numerados 1..=total_paginas
    pub paginas: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginaDemandas {
    pub itens: Vec<ItemDemanda>,
    pub paginacao: Paginacao,
    // Preenchida quando nenhum item passa nos filtros
    pub mensagem: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetalheDemanda {
    pub demanda: Demanda,
    #[schema(example = "01/04/2025")]
    pub data_formatada: String,
    pub data_resolucao_formatada: Option<String>,
    pub criticidade_label: Option<String>,
    pub status_label: Option<String>,
    #[schema(example = "R$ 150.00")]
    pub custo_formatado: String,
}

// --- CRIAÇÃO ---

fn validate_not_blank(valor: &str) -> Result<(), ValidationError> {
    if valor.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn validate_criticidade(valor: &str) -> Result<(), ValidationError> {
    let valor = valor.trim();
    if valor.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("A criticidade é obrigatória.".into());
        return Err(err);
    }
    if Criticidade::parse(valor).is_none() {
        let mut err = ValidationError::new("criticidade");
        err.message = Some("A criticidade deve ser baixa, media ou alta.".into());
        return Err(err);
    }
    Ok(())
}

// Campos ausentes chegam como string vazia, para que todos apareçam no mesmo erro.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovaDemandaPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "O título é obrigatório."))]
    #[schema(example = "Portão da garagem travando")]
    pub titulo: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "A categoria é obrigatória."))]
    #[schema(example = "seguranca")]
    pub categoria: String,

    #[serde(default)]
    #[validate(custom(function = "validate_criticidade"))]
    #[schema(example = "alta")]
    pub criticidade: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "A descrição é obrigatória."))]
    #[schema(example = "O portão trava na metade do curso.")]
    pub descricao: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "A localização é obrigatória."))]
    #[schema(example = "Garagem do subsolo")]
    pub localizacao: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandaCriada {
    pub demanda: Demanda,
    pub notificacao: Notificacao,
}

// --- EDIÇÃO ---

// Mesmos campos do cadastro; o status é opcional e, se vier, passa pela mesma transição do PATCH.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditarDemandaPayload {
    #[serde(flatten)]
    pub campos: NovaDemandaPayload,
    #[serde(default)]
    #[schema(example = "em-andamento")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandaAtualizada {
    pub demanda: Demanda,
    pub notificacao: Notificacao,
}

// --- TRANSIÇÃO DE STATUS ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarStatusPayload {
    #[schema(example = "resolvida")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusAtualizado {
    pub demanda: Demanda,
    pub notificacao: Notificacao,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_desconhecido_sobrevive_ida_e_volta() {
        let status: DemandaStatus = serde_json::from_value(json!("arquivada")).unwrap();
        assert_eq!(status, DemandaStatus::Desconhecido("arquivada".into()));
        assert!(!status.is_aberta());
        assert!(!status.is_encerrada());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("arquivada"));
    }

    #[test]
    fn demanda_usa_nomes_do_armazenamento() {
        let raw = json!({
            "id": "002",
            "titulo": "Vazamento no banheiro social",
            "categoria": "hidraulica",
            "categoriaLabel": "Hidráulica",
            "data": "2025-03-28",
            "criticidade": "alta",
            "status": "resolvida",
            "descricao": "Vazamento na tubulação.",
            "localizacao": "Banheiro social",
            "custo": 350,
            "dataResolucao": "2025-04-02"
        });
        let demanda: Demanda = serde_json::from_value(raw).unwrap();
        assert_eq!(demanda.status, DemandaStatus::Resolvida);
        assert_eq!(demanda.criticidade, Criticidade::Alta);
        assert_eq!(demanda.custo, Decimal::new(350, 0));
        assert_eq!(demanda.data_resolucao, NaiveDate::from_ymd_opt(2025, 4, 2));

        let volta = serde_json::to_value(&demanda).unwrap();
        assert_eq!(volta["categoriaLabel"], "Hidráulica");
        assert_eq!(volta["dataResolucao"], "2025-04-02");
        assert_eq!(volta["status"], "resolvida");
    }

    #[test]
    fn sem_data_resolucao_o_campo_some() {
        let raw = json!({
            "id": "006", "titulo": "Interfone", "categoria": "eletrica",
            "categoriaLabel": "Elétrica", "data": "2025-03-12", "criticidade": "media",
            "status": "aberta", "descricao": "x", "localizacao": "302", "custo": 0
        });
        let demanda: Demanda = serde_json::from_value(raw).unwrap();
        let volta = serde_json::to_value(&demanda).unwrap();
        assert!(volta.get("dataResolucao").is_none());
    }

    #[test]
    fn payload_vazio_reporta_todos_os_campos() {
        let payload: NovaDemandaPayload = serde_json::from_value(json!({ "titulo": "   " })).unwrap();
        let errors = payload.validate().unwrap_err();
        let campos = errors.field_errors();
        for campo in ["titulo", "categoria", "criticidade", "descricao", "localizacao"] {
            assert!(campos.contains_key(campo), "faltou o campo {campo}");
        }
    }

    #[test]
    fn criticidade_fora_da_lista_e_rejeitada() {
        let payload = NovaDemandaPayload {
            titulo: "t".into(),
            categoria: "limpeza".into(),
            criticidade: "urgente".into(),
            descricao: "d".into(),
            localizacao: "l".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("criticidade"));
    }
}
