// src/common/format.rs
//
// Formatação de textos exibidos ao usuário (padrão pt-BR).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

pub fn hoje() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// 2025-04-01 -> "01/04/2025"
pub fn formatar_data(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

// Custo zero significa "não definido"
pub fn formatar_custo(custo: Decimal) -> String {
    if custo > Decimal::ZERO {
        format!("R$ {:.2}", custo)
    } else {
        "Não definido".to_string()
    }
}

// Rótulo de mês do gráfico de evolução: "4/2025" (sem zero à esquerda)
pub fn rotulo_mes(ano: i32, mes: u32) -> String {
    format!("{}/{}", mes, ano)
}

// Chave de mês dos dados brutos: "04/2025"
pub fn chave_mes(data: NaiveDate) -> String {
    format!("{:02}/{}", data.month(), data.year())
}

/// "+12.5% em relação ao período anterior", "-1.2 dias em relação ao período anterior"
pub fn formatar_variacao(valor: f64, unidade: &str) -> String {
    let sinal = if valor >= 0.0 { "+" } else { "" };
    format!("{}{:.1}{} em relação ao período anterior", sinal, valor, unidade)
}

pub fn arredondar(valor: f64) -> f64 {
    (valor * 10.0).round() / 10.0
}
