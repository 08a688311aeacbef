// src/models/dashboard.rs

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;
use crate::models::demanda::ItemDemanda;

// --- PERÍODO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodo {
    // Últimos N dias (N >= 1)
    Dias(u32),
    // Sem recorte e sem período anterior para comparar
    Todos,
}

pub const PERIODO_PADRAO: Periodo = Periodo::Dias(30);

// Cem anos de retrospecto
pub const MAX_DIAS_PERIODO: u32 = 36_500;

impl Periodo {
    pub fn dias(&self) -> Option<u32> {
        match self {
            Periodo::Dias(n) => Some(*n),
            Periodo::Todos => None,
        }
    }
}

// Aceita tanto o número de dias ("30") quanto os seletores nomeados ("ultimos_30_dias").
impl FromStr for Periodo {
    type Err = AppError;

    fn from_str(valor: &str) -> Result<Self, Self::Err> {
        let valor = valor.trim();
        let periodo = match valor {
            "ultimos_7_dias" => Periodo::Dias(7),
            "ultimos_30_dias" => Periodo::Dias(30),
            "ultimos_90_dias" => Periodo::Dias(90),
            "ultimos_6_meses" => Periodo::Dias(180),
            "ultimo_ano" => Periodo::Dias(365),
            "todos" => Periodo::Todos,
            numero => match numero.parse::<u32>() {
                Ok(n) if (1..=MAX_DIAS_PERIODO).contains(&n) => Periodo::Dias(n),
                _ => return Err(AppError::PeriodoInvalido(valor.to_string())),
            },
        };
        Ok(periodo)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodoQuery {
    /// Dias de retrospecto ("7", "30"...) ou "ultimos_7_dias", "ultimos_30_dias",
    /// "ultimos_90_dias", "ultimos_6_meses", "ultimo_ano", "todos". Padrão: 30.
    #[param(example = "30")]
    pub periodo: Option<String>,
}

impl PeriodoQuery {
    pub fn periodo(&self) -> Result<Periodo, AppError> {
        match self.periodo.as_deref() {
            None | Some("") => Ok(PERIODO_PADRAO),
            Some(valor) => valor.parse(),
        }
    }
}

/// Intervalo de datas: `inicio <= data < fim`. Limite ausente = aberto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Janela {
    pub inicio: Option<NaiveDate>,
    pub fim: Option<NaiveDate>,
}

impl Janela {
    pub fn contem(&self, data: NaiveDate) -> bool {
        self.inicio.is_none_or(|inicio| data >= inicio) && self.fim.is_none_or(|fim| data < fim)
    }
}

// --- INDICADORES ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoPeriodo {
    pub total_demandas: usize,
    pub demandas_abertas: usize,
    pub demandas_resolvidas: usize,
    // 0..=100
    pub taxa_resolucao: f64,
    // Em dias
    pub tempo_medio_resolucao: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variacoes {
    // Variação percentual
    pub total_demandas: f64,
    // Variação percentual
    pub demandas_abertas: f64,
    // Diferença absoluta em dias
    pub tempo_medio_resolucao: f64,
    // Diferença em pontos percentuais
    pub taxa_resolucao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Indicadores {
    pub periodo_dias: Option<u32>,
    pub janela_atual: Janela,
    pub janela_anterior: Option<Janela>,
    pub atual: ResumoPeriodo,
    pub anterior: Option<ResumoPeriodo>,
    pub variacoes: Variacoes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tendencia {
    Positive,
    Negative,
}

// Um card do topo do dashboard, já com os textos prontos
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartaoIndicador {
    #[schema(example = "8.5 dias")]
    pub valor: String,
    #[schema(example = "-2.3 dias em relação ao período anterior")]
    pub variacao: String,
    pub tendencia: Tendencia,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartoesIndicadores {
    pub total_demandas: CartaoIndicador,
    pub demandas_abertas: CartaoIndicador,
    pub tempo_medio: CartaoIndicador,
    pub taxa_resolucao: CartaoIndicador,
}

// --- GRÁFICOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipoGrafico {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetGrafico {
    #[schema(example = "Demandas Abertas")]
    pub label: String,
    pub data: Vec<usize>,
    #[schema(example = "rgba(54, 162, 235, 0.8)")]
    pub background_color: String,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

/// Especificação de gráfico pronta para o front (formato próximo ao do Chart.js).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grafico {
    pub tipo: TipoGrafico,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetGrafico>,
    pub empilhado: bool,
    pub titulo_eixo_x: Option<String>,
    pub titulo_eixo_y: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContagemStatusCategoria {
    pub status: String,
    pub categoria: String,
    pub quantidade: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContagemMesStatus {
    #[schema(example = "04/2025")]
    pub mes: String,
    pub status: String,
    pub quantidade: usize,
}

// Dados agrupados para o front desenhar o gráfico por conta própria
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DadosBrutos {
    pub status_categoria: Vec<ContagemStatusCategoria>,
    pub evolucao: Vec<ContagemMesStatus>,
    pub meses_ordenados: Vec<String>,
    pub categorias: Vec<String>,
    pub status: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Graficos {
    pub status_categoria: Grafico,
    pub evolucao: Grafico,
    pub dados_brutos: DadosBrutos,
}

// --- LISTA DE CRÍTICAS ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandasCriticas {
    pub itens: Vec<ItemDemanda>,
    pub mensagem: Option<String>,
}

// --- TELA COMPLETA ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub indicadores: Indicadores,
    pub cartoes: CartoesIndicadores,
    pub graficos: Graficos,
    pub criticas: DemandasCriticas,
}
