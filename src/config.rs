// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    db::{DemandaRepository, FileStore, KeyValueStore},
    models::catalogo::Catalogo,
    services::{DashboardService, DemandaService},
};

pub const DATA_FILE_PADRAO: &str = "data/demandas.json";
pub const SERVER_ADDR_PADRAO: &str = "0.0.0.0:3000";

// Configuração lida do ambiente (ou do .env)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub server_addr: String,
    pub seed_defaults: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|chave| env::var(chave).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_file = lookup("DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DATA_FILE_PADRAO.to_string());

        let server_addr = lookup("SERVER_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| SERVER_ADDR_PADRAO.to_string());

        let seed_defaults = match lookup("SEED_DEFAULTS") {
            Some(valor) => parse_bool(&valor)
                .with_context(|| format!("SEED_DEFAULTS deve ser true ou false, recebido '{}'", valor))?,
            None => true,
        };

        Ok(Self { data_file: PathBuf::from(data_file), server_addr, seed_defaults })
    }
}

fn parse_bool(valor: &str) -> Option<bool> {
    match valor.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "sim" | "yes" => Some(true),
        "false" | "0" | "nao" | "não" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub demanda_service: DemandaService,
    pub dashboard_service: DashboardService,
    pub catalogo: Arc<Catalogo>,
    pub i18n_store: I18nStore,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let store = FileStore::new(&settings.data_file);
        tracing::info!("📂 Dados persistidos em {}", store.path().display());

        let app_state = Self::with_store(Arc::new(store));

        if settings.seed_defaults {
            let semeou = app_state
                .demanda_service
                .seed_defaults()
                .await
                .context("Falha ao gravar as demandas iniciais")?;
            if semeou {
                tracing::info!("🌱 Demandas iniciais gravadas");
            }
        }

        Ok(app_state)
    }

    // --- Monta o gráfico de dependências sobre qualquer store ---
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let catalogo = Arc::new(Catalogo::padrao());
        let repo = DemandaRepository::new(store);

        Self {
            demanda_service: DemandaService::new(repo.clone(), catalogo.clone()),
            dashboard_service: DashboardService::new(repo, catalogo.clone()),
            catalogo,
            i18n_store: I18nStore::new(),
        }
    }
}
