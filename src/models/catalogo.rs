// src/models/catalogo.rs
//
// Tabelas fixas de rótulos, classes de badge e categorias. Montadas uma vez e
// compartilhadas (somente leitura) por quem precisa delas.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::demanda::{Criticidade, DemandaStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Categoria {
    #[schema(example = "eletrica")]
    pub codigo: String,
    #[schema(example = "Elétrica")]
    pub label: String,
}

// Cada tela usa seu próprio conjunto de classes CSS para os badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tema {
    Listagem,
    Dashboard,
}

#[derive(Debug, Clone)]
struct ClassesBadge {
    status: HashMap<DemandaStatus, &'static str>,
    criticidade: HashMap<Criticidade, &'static str>,
}

#[derive(Debug, Clone)]
pub struct Catalogo {
    rotulos_status: HashMap<DemandaStatus, &'static str>,
    rotulos_criticidade: HashMap<Criticidade, &'static str>,
    classes: HashMap<Tema, ClassesBadge>,
    categorias: Vec<Categoria>,
}

impl Catalogo {
    pub fn padrao() -> Self {
        use Criticidade::*;
        use DemandaStatus::*;

        let rotulos_status = HashMap::from([
            (Aberta, "Aberta"),
            (EmAnalise, "Em Análise"),
            (EmAndamento, "Em Andamento"),
            (AguardandoTerceiros, "Aguardando Terceiros"),
            (Resolvida, "Resolvida"),
            (Cancelada, "Cancelada"),
        ]);

        let rotulos_criticidade = HashMap::from([(Baixa, "Baixa"), (Media, "Média"), (Alta, "Alta")]);

        let listagem = ClassesBadge {
            status: HashMap::from([
                (Aberta, "badge-open"),
                (EmAnalise, "badge-open"),
                (EmAndamento, "badge-in-progress"),
                (AguardandoTerceiros, "badge-waiting"),
                (Resolvida, "badge-resolved"),
                (Cancelada, "badge-waiting"),
            ]),
            criticidade: HashMap::from([
                (Baixa, "badge-low"),
                (Media, "badge-medium"),
                (Alta, "badge-high"),
            ]),
        };

        let dashboard = ClassesBadge {
            status: HashMap::from([
                (Aberta, "badge-secondary"),
                (EmAnalise, "badge-info"),
                (EmAndamento, "badge-primary"),
                (AguardandoTerceiros, "badge-warning"),
                (Resolvida, "badge-success"),
                (Cancelada, "badge-danger"),
            ]),
            criticidade: HashMap::from([
                (Baixa, "badge-success"),
                (Media, "badge-warning"),
                (Alta, "badge-danger"),
            ]),
        };

        let categorias = [
            ("eletrica", "Elétrica"),
            ("hidraulica", "Hidráulica"),
            ("limpeza", "Limpeza"),
            ("estrutural", "Estrutural"),
            ("seguranca", "Segurança"),
            ("areas-comuns", "Áreas Comuns"),
            ("outros", "Outros"),
        ]
        .into_iter()
        .map(|(codigo, label)| Categoria { codigo: codigo.to_string(), label: label.to_string() })
        .collect();

        Self {
            rotulos_status,
            rotulos_criticidade,
            classes: HashMap::from([(Tema::Listagem, listagem), (Tema::Dashboard, dashboard)]),
            categorias,
        }
    }

    pub fn rotulo_status(&self, status: &DemandaStatus) -> Option<&'static str> {
        self.rotulos_status.get(status).copied()
    }

    pub fn rotulo_criticidade(&self, criticidade: &Criticidade) -> Option<&'static str> {
        self.rotulos_criticidade.get(criticidade).copied()
    }

    pub fn classe_status(&self, tema: Tema, status: &DemandaStatus) -> Option<&'static str> {
        self.classes.get(&tema)?.status.get(status).copied()
    }

    pub fn classe_criticidade(&self, tema: Tema, criticidade: &Criticidade) -> Option<&'static str> {
        self.classes.get(&tema)?.criticidade.get(criticidade).copied()
    }

    pub fn categorias(&self) -> &[Categoria] {
        &self.categorias
    }

    pub fn rotulo_categoria(&self, codigo: &str) -> Option<&str> {
        self.categorias
            .iter()
            .find(|c| c.codigo == codigo)
            .map(|c| c.label.as_str())
    }
}

impl Default for Catalogo {
    fn default() -> Self {
        Self::padrao()
    }
}
