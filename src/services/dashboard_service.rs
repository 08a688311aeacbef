// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    common::format::{self, arredondar},
    db::DemandaRepository,
    models::{
        catalogo::{Catalogo, Tema},
        dashboard::{
            CartaoIndicador, CartoesIndicadores, ContagemMesStatus, ContagemStatusCategoria,
            DadosBrutos, Dashboard, DatasetGrafico, DemandasCriticas, Grafico, Graficos,
            Indicadores, Janela, Periodo, ResumoPeriodo, Tendencia, TipoGrafico, Variacoes,
        },
        demanda::{Criticidade, Demanda, DemandaStatus},
    },
    services::demanda_service::item_demanda,
};

// Valores exibidos quando não há nenhuma demanda resolvida com data no período
pub const TEMPO_MEDIO_PADRAO_ATUAL: f64 = 8.5;
pub const TEMPO_MEDIO_PADRAO_ANTERIOR: f64 = 10.8;

pub const MESES_EVOLUCAO: i32 = 6;
pub const LIMITE_CRITICAS: usize = 3;

const AZUL: &str = "rgba(54, 162, 235, 1)";
const VERDE: &str = "rgba(75, 192, 192, 1)";

#[derive(Clone)]
pub struct DashboardService {
    repo: DemandaRepository,
    catalogo: Arc<Catalogo>,
}

impl DashboardService {
    pub fn new(repo: DemandaRepository, catalogo: Arc<Catalogo>) -> Self {
        Self { repo, catalogo }
    }

    pub async fn get_indicadores(&self, periodo: Periodo, hoje: NaiveDate) -> Indicadores {
        let demandas = self.repo.list_all().await;
        calcular_indicadores(&demandas, periodo, hoje)
    }

    pub async fn get_graficos(&self, periodo: Periodo, hoje: NaiveDate) -> Graficos {
        let demandas = self.repo.list_all().await;
        montar_graficos(&demandas, periodo, hoje)
    }

    pub async fn get_criticas(&self) -> DemandasCriticas {
        let demandas = self.repo.list_all().await;
        montar_criticas(&demandas, &self.catalogo)
    }

    // Tudo de uma vez, a partir de uma única leitura do store
    pub async fn get_dashboard(&self, periodo: Periodo, hoje: NaiveDate) -> Dashboard {
        let demandas = self.repo.list_all().await;
        let indicadores = calcular_indicadores(&demandas, periodo, hoje);
        Dashboard {
            cartoes: montar_cartoes(&indicadores),
            indicadores,
            graficos: montar_graficos(&demandas, periodo, hoje),
            criticas: montar_criticas(&demandas, &self.catalogo),
        }
    }
}

// =============================================================================
//  JANELAS DE PERÍODO
// =============================================================================

/// Janela atual e anterior. Com N dias, a atual cobre as datas a menos de N dias de
/// `hoje` (inclusive futuras) e a anterior os N dias imediatamente antes dela.
pub fn janelas(periodo: Periodo, hoje: NaiveDate) -> (Janela, Option<Janela>) {
    match periodo {
        Periodo::Todos => (Janela { inicio: None, fim: None }, None),
        Periodo::Dias(n) => {
            let n = i64::from(n.max(1));
            // Antes do menor NaiveDate a janela fica aberta no início
            let inicio_atual = hoje.checked_sub_signed(Duration::days(n - 1));
            let inicio_anterior = inicio_atual.and_then(|i| i.checked_sub_signed(Duration::days(n)));
            (
                Janela { inicio: inicio_atual, fim: None },
                Some(Janela { inicio: inicio_anterior, fim: inicio_atual.or(Some(NaiveDate::MIN)) }),
            )
        }
    }
}

fn na_janela<'a>(demandas: &'a [Demanda], janela: &Janela) -> Vec<&'a Demanda> {
    demandas.iter().filter(|d| janela.contem(d.data)).collect()
}

// =============================================================================
//  INDICADORES
// =============================================================================

pub fn resumir(demandas: &[&Demanda], tempo_medio_padrao: f64) -> ResumoPeriodo {
    let total = demandas.len();
    let abertas = demandas.iter().filter(|d| d.status.is_aberta()).count();
    let resolvidas = demandas.iter().filter(|d| d.status == DemandaStatus::Resolvida).count();

    let taxa_resolucao = if total > 0 {
        resolvidas as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let dias_resolucao: Vec<i64> = demandas
        .iter()
        .filter(|d| d.status == DemandaStatus::Resolvida)
        .filter_map(|d| d.data_resolucao.map(|r| (r - d.data).num_days()))
        .collect();

    let tempo_medio_resolucao = if dias_resolucao.is_empty() {
        tempo_medio_padrao
    } else {
        dias_resolucao.iter().sum::<i64>() as f64 / dias_resolucao.len() as f64
    };

    ResumoPeriodo {
        total_demandas: total,
        demandas_abertas: abertas,
        demandas_resolvidas: resolvidas,
        taxa_resolucao,
        tempo_medio_resolucao,
    }
}

fn variacao_percentual(atual: f64, anterior: f64) -> f64 {
    if anterior > 0.0 { (atual - anterior) / anterior * 100.0 } else { 0.0 }
}

fn diferenca(atual: f64, anterior: f64) -> f64 {
    if anterior > 0.0 { atual - anterior } else { 0.0 }
}

// Denominador (ou base de comparação) zero resulta em variação zero.
pub fn calcular_variacoes(atual: &ResumoPeriodo, anterior: &ResumoPeriodo) -> Variacoes {
    Variacoes {
        total_demandas: variacao_percentual(atual.total_demandas as f64, anterior.total_demandas as f64),
        demandas_abertas: variacao_percentual(
            atual.demandas_abertas as f64,
            anterior.demandas_abertas as f64,
        ),
        tempo_medio_resolucao: diferenca(atual.tempo_medio_resolucao, anterior.tempo_medio_resolucao),
        taxa_resolucao: diferenca(atual.taxa_resolucao, anterior.taxa_resolucao),
    }
}

fn arredondar_resumo(resumo: ResumoPeriodo) -> ResumoPeriodo {
    ResumoPeriodo {
        taxa_resolucao: arredondar(resumo.taxa_resolucao),
        tempo_medio_resolucao: arredondar(resumo.tempo_medio_resolucao),
        ..resumo
    }
}

pub fn calcular_indicadores(demandas: &[Demanda], periodo: Periodo, hoje: NaiveDate) -> Indicadores {
    let (janela_atual, janela_anterior) = janelas(periodo, hoje);

    let atual = resumir(&na_janela(demandas, &janela_atual), TEMPO_MEDIO_PADRAO_ATUAL);
    let anterior = janela_anterior
        .as_ref()
        .map(|janela| resumir(&na_janela(demandas, janela), TEMPO_MEDIO_PADRAO_ANTERIOR));

    // As variações usam os valores sem arredondamento
    let variacoes = anterior
        .as_ref()
        .map(|anterior| calcular_variacoes(&atual, anterior))
        .unwrap_or_default();

    Indicadores {
        periodo_dias: periodo.dias(),
        janela_atual,
        janela_anterior,
        atual: arredondar_resumo(atual),
        anterior: anterior.map(arredondar_resumo),
        variacoes: Variacoes {
            total_demandas: arredondar(variacoes.total_demandas),
            demandas_abertas: arredondar(variacoes.demandas_abertas),
            tempo_medio_resolucao: arredondar(variacoes.tempo_medio_resolucao),
            taxa_resolucao: arredondar(variacoes.taxa_resolucao),
        },
    }
}

fn tendencia(melhorou: bool) -> Tendencia {
    if melhorou { Tendencia::Positive } else { Tendencia::Negative }
}

pub fn montar_cartoes(indicadores: &Indicadores) -> CartoesIndicadores {
    let atual = &indicadores.atual;
    let var = &indicadores.variacoes;

    CartoesIndicadores {
        total_demandas: CartaoIndicador {
            valor: atual.total_demandas.to_string(),
            variacao: format::formatar_variacao(var.total_demandas, "%"),
            tendencia: tendencia(var.total_demandas >= 0.0),
        },
        demandas_abertas: CartaoIndicador {
            valor: atual.demandas_abertas.to_string(),
            variacao: format::formatar_variacao(var.demandas_abertas, "%"),
            tendencia: tendencia(var.demandas_abertas >= 0.0),
        },
        // Tempo de resolução menor é melhor
        tempo_medio: CartaoIndicador {
            valor: format!("{:.1} dias", atual.tempo_medio_resolucao),
            variacao: format::formatar_variacao(var.tempo_medio_resolucao, " dias"),
            tendencia: tendencia(var.tempo_medio_resolucao <= 0.0),
        },
        taxa_resolucao: CartaoIndicador {
            valor: format!("{:.1}%", atual.taxa_resolucao),
            variacao: format::formatar_variacao(var.taxa_resolucao, "%"),
            tendencia: tendencia(var.taxa_resolucao >= 0.0),
        },
    }
}

// =============================================================================
//  GRÁFICOS
// =============================================================================

fn dataset(label: &str, data: Vec<usize>, fundo: &str, borda: &str) -> DatasetGrafico {
    DatasetGrafico {
        label: label.to_string(),
        data,
        background_color: fundo.to_string(),
        border_color: borda.to_string(),
        border_width: None,
        tension: None,
        fill: None,
    }
}

/// Barras empilhadas por categoria (na ordem em que aparecem): abertas x encerradas.
pub fn grafico_status_categoria(demandas: &[&Demanda]) -> Grafico {
    // (categoria, abertas, encerradas)
    let mut grupos: Vec<(String, usize, usize)> = Vec::new();
    for demanda in demandas {
        let pos = match grupos.iter().position(|(cat, _, _)| *cat == demanda.categoria_label) {
            Some(pos) => pos,
            None => {
                grupos.push((demanda.categoria_label.clone(), 0, 0));
                grupos.len() - 1
            }
        };
        if demanda.status.is_encerrada() {
            grupos[pos].2 += 1;
        } else {
            grupos[pos].1 += 1;
        }
    }

    let abertas = DatasetGrafico {
        border_width: Some(1),
        ..dataset(
            "Demandas Abertas",
            grupos.iter().map(|g| g.1).collect(),
            "rgba(54, 162, 235, 0.8)",
            AZUL,
        )
    };
    let encerradas = DatasetGrafico {
        border_width: Some(1),
        ..dataset(
            "Demandas Encerradas",
            grupos.iter().map(|g| g.2).collect(),
            "rgba(75, 192, 192, 0.8)",
            VERDE,
        )
    };

    Grafico {
        tipo: TipoGrafico::Bar,
        labels: grupos.into_iter().map(|g| g.0).collect(),
        datasets: vec![abertas, encerradas],
        empilhado: true,
        titulo_eixo_x: Some("Categoria".to_string()),
        titulo_eixo_y: Some("Quantidade".to_string()),
    }
}

// (ano, mês) `n` meses antes de `data`
fn mes_anterior(data: NaiveDate, n: i32) -> (i32, u32) {
    let indice = data.year() * 12 + data.month0() as i32 - n;
    (indice.div_euclid(12), indice.rem_euclid(12) as u32 + 1)
}

/// Linhas dos últimos 6 meses (incluindo o atual) sobre todas as demandas:
/// criadas por mês de abertura e resolvidas por mês de resolução.
pub fn grafico_evolucao(demandas: &[Demanda], hoje: NaiveDate) -> Grafico {
    let meses: Vec<(i32, u32)> = (0..MESES_EVOLUCAO).rev().map(|i| mes_anterior(hoje, i)).collect();
    let mut novas = vec![0usize; meses.len()];
    let mut resolvidas = vec![0usize; meses.len()];

    let indice = |data: NaiveDate| meses.iter().position(|&(a, m)| a == data.year() && m == data.month());

    for demanda in demandas {
        if let Some(i) = indice(demanda.data) {
            novas[i] += 1;
        }
        if demanda.status == DemandaStatus::Resolvida {
            if let Some(i) = demanda.data_resolucao.and_then(indice) {
                resolvidas[i] += 1;
            }
        }
    }

    let linha = |label: &str, data: Vec<usize>, fundo: &str, borda: &str| DatasetGrafico {
        tension: Some(0.4),
        fill: Some(true),
        ..dataset(label, data, fundo, borda)
    };

    Grafico {
        tipo: TipoGrafico::Line,
        labels: meses.iter().map(|&(a, m)| format::rotulo_mes(a, m)).collect(),
        datasets: vec![
            linha("Novas Demandas", novas, "rgba(54, 162, 235, 0.2)", AZUL),
            linha("Demandas Resolvidas", resolvidas, "rgba(75, 192, 192, 0.2)", VERDE),
        ],
        empilhado: false,
        titulo_eixo_x: None,
        titulo_eixo_y: None,
    }
}

// Valores distintos na ordem da primeira aparição
fn distintos<'a>(valores: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut vistos: Vec<String> = Vec::new();
    for v in valores {
        if !vistos.iter().any(|x| x == v) {
            vistos.push(v.to_string());
        }
    }
    vistos
}

/// Contagens agrupadas para o front renderizar sozinho quando preferir.
pub fn dados_brutos(demandas: &[&Demanda]) -> DadosBrutos {
    let mut status_categoria: Vec<ContagemStatusCategoria> = Vec::new();
    for d in demandas {
        match status_categoria
            .iter_mut()
            .find(|c| c.status == d.status.codigo() && c.categoria == d.categoria)
        {
            Some(c) => c.quantidade += 1,
            None => status_categoria.push(ContagemStatusCategoria {
                status: d.status.codigo().to_string(),
                categoria: d.categoria.clone(),
                quantidade: 1,
            }),
        }
    }
    status_categoria.sort_by(|a, b| (&a.status, &a.categoria).cmp(&(&b.status, &b.categoria)));

    // ((ano, mês), status) -> quantidade
    let mut evolucao: Vec<((i32, u32), String, usize)> = Vec::new();
    for d in demandas {
        let mes = (d.data.year(), d.data.month());
        match evolucao.iter_mut().find(|(m, s, _)| *m == mes && s == d.status.codigo()) {
            Some(entrada) => entrada.2 += 1,
            None => evolucao.push((mes, d.status.codigo().to_string(), 1)),
        }
    }
    evolucao.sort();

    let mut meses: Vec<NaiveDate> = demandas.iter().map(|d| d.data.with_day(1).unwrap_or(d.data)).collect();
    meses.sort();
    meses.dedup();

    DadosBrutos {
        status_categoria,
        evolucao: evolucao
            .into_iter()
            .map(|((ano, mes), status, quantidade)| ContagemMesStatus {
                mes: format!("{:02}/{}", mes, ano),
                status,
                quantidade,
            })
            .collect(),
        meses_ordenados: meses.into_iter().map(format::chave_mes).collect(),
        categorias: distintos(demandas.iter().map(|d| d.categoria.as_str())),
        status: distintos(demandas.iter().map(|d| d.status.codigo())),
    }
}

pub fn montar_graficos(demandas: &[Demanda], periodo: Periodo, hoje: NaiveDate) -> Graficos {
    let (janela_atual, _) = janelas(periodo, hoje);
    let do_periodo = na_janela(demandas, &janela_atual);

    Graficos {
        status_categoria: grafico_status_categoria(&do_periodo),
        evolucao: grafico_evolucao(demandas, hoje),
        dados_brutos: dados_brutos(&do_periodo),
    }
}

// =============================================================================
//  DEMANDAS CRÍTICAS
// =============================================================================

/// Alta criticidade e ainda não encerradas, mais recentes primeiro, no máximo 3.
pub fn selecionar_criticas(demandas: &[Demanda]) -> Vec<&Demanda> {
    let mut criticas: Vec<&Demanda> = demandas
        .iter()
        .filter(|d| d.criticidade == Criticidade::Alta && !d.status.is_encerrada())
        .collect();
    criticas.sort_by(|a, b| b.data.cmp(&a.data));
    criticas.truncate(LIMITE_CRITICAS);
    criticas
}

pub fn montar_criticas(demandas: &[Demanda], catalogo: &Catalogo) -> DemandasCriticas {
    let itens: Vec<_> = selecionar_criticas(demandas)
        .into_iter()
        .map(|d| item_demanda(d, catalogo, Tema::Dashboard))
        .collect();
    let mensagem = itens
        .is_empty()
        .then(|| "Não há demandas críticas no momento.".to_string());
    DemandasCriticas { itens, mensagem }
}
