// src/db/demanda_repo.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    common::error::AppError,
    db::store::{self, KeyValueStore},
    models::demanda::{Criticidade, Demanda, DemandaStatus},
};

pub const CHAVE_DEMANDAS: &str = "demandas";

// O repositório de demandas: a lista inteira vive sob uma única chave do store.
#[derive(Clone)]
pub struct DemandaRepository {
    store: Arc<dyn KeyValueStore>,
    // Toda leitura-modificação-escrita passa por aqui (IDs sem duplicata, nada se perde)
    write_lock: Arc<Mutex<()>>,
}

impl DemandaRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, write_lock: Arc::new(Mutex::new(())) }
    }

    // Grava as demandas iniciais se a chave ainda não existir. Retorna true se semeou.
    pub async fn seed_if_absent(&self) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        if self.store.get(CHAVE_DEMANDAS).await?.is_some() {
            return Ok(false);
        }
        store::save(self.store.as_ref(), CHAVE_DEMANDAS, &demandas_iniciais()).await?;
        Ok(true)
    }

    pub async fn list_all(&self) -> Vec<Demanda> {
        store::load(self.store.as_ref(), CHAVE_DEMANDAS, Vec::new()).await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Demanda> {
        self.list_all().await.into_iter().find(|d| d.id == id)
    }

    // Leitura para regravação: uma demanda ilegível aborta em vez de virar lista vazia
    async fn list_for_write(&self) -> Result<Vec<Demanda>, AppError> {
        let demandas = store::try_load(self.store.as_ref(), CHAVE_DEMANDAS)
            .await
            .inspect_err(|e| tracing::error!("❌ Demandas gravadas ilegíveis, escrita recusada: {}", e))?;
        Ok(demandas.unwrap_or_default())
    }

    // Monta a nova demanda a partir da lista atual e a anexa, tudo sob o mesmo lock.
    pub async fn insert_with<F>(&self, build: F) -> Result<Demanda, AppError>
    where
        F: FnOnce(&[Demanda]) -> Demanda,
    {
        let _guard = self.write_lock.lock().await;
        let mut demandas = self.list_for_write().await?;
        let nova = build(&demandas);
        demandas.push(nova.clone());
        store::save(self.store.as_ref(), CHAVE_DEMANDAS, &demandas).await?;
        Ok(nova)
    }

    // Aplica `change` na demanda com o ID dado. Retorna None se ela não existir.
    pub async fn update_with<F>(&self, id: &str, change: F) -> Result<Option<Demanda>, AppError>
    where
        F: FnOnce(&mut Demanda),
    {
        let _guard = self.write_lock.lock().await;
        let mut demandas = self.list_for_write().await?;
        let Some(demanda) = demandas.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        change(demanda);
        let atualizada = demanda.clone();
        store::save(self.store.as_ref(), CHAVE_DEMANDAS, &demandas).await?;
        Ok(Some(atualizada))
    }
}

fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, dia).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn demanda(
    id: &str,
    titulo: &str,
    categoria: (&str, &str),
    dia: NaiveDate,
    criticidade: Criticidade,
    status: DemandaStatus,
    descricao: &str,
    localizacao: &str,
    custo: i64,
) -> Demanda {
    Demanda {
        id: id.to_string(),
        titulo: titulo.to_string(),
        categoria: categoria.0.to_string(),
        categoria_label: categoria.1.to_string(),
        data: dia,
        criticidade,
        status,
        descricao: descricao.to_string(),
        localizacao: localizacao.to_string(),
        custo: Decimal::new(custo, 0),
        data_resolucao: None,
    }
}

/// Demandas gravadas na primeira execução.
pub fn demandas_iniciais() -> Vec<Demanda> {
    use Criticidade::*;
    use DemandaStatus::*;

    vec![
        demanda(
            "001",
            "Lâmpadas queimadas no corredor",
            ("eletrica", "Elétrica"),
            data(2025, 4, 1),
            Media,
            EmAndamento,
            "Três lâmpadas queimadas no corredor do 2º andar, próximo aos apartamentos 201-204.",
            "Corredor do 2º andar",
            150,
        ),
        demanda(
            "002",
            "Vazamento no banheiro social",
            ("hidraulica", "Hidráulica"),
            data(2025, 3, 28),
            Alta,
            Resolvida,
            "Vazamento na tubulação do banheiro social da área comum, próximo à piscina.",
            "Banheiro social da área comum",
            350,
        ),
        demanda(
            "003",
            "Limpeza da área da piscina",
            ("limpeza", "Limpeza"),
            data(2025, 3, 25),
            Baixa,
            Resolvida,
            "Limpeza geral da área da piscina, incluindo deck e mobiliário.",
            "Área da piscina",
            200,
        ),
        demanda(
            "004",
            "Trinca na parede do hall",
            ("estrutural", "Estrutural"),
            data(2025, 3, 20),
            Alta,
            AguardandoTerceiros,
            "Trinca na parede do hall de entrada, próximo ao elevador. Necessita avaliação estrutural.",
            "Hall de entrada",
            0,
        ),
        demanda(
            "005",
            "Câmera de segurança com defeito",
            ("seguranca", "Segurança"),
            data(2025, 3, 15),
            Alta,
            Resolvida,
            "Câmera de segurança da entrada principal não está funcionando.",
            "Entrada principal",
            420,
        ),
        demanda(
            "006",
            "Interfone do apartamento 302 não funciona",
            ("eletrica", "Elétrica"),
            data(2025, 3, 12),
            Media,
            Aberta,
            "Interfone do apartamento 302 não está recebendo chamadas da portaria.",
            "Apartamento 302",
            0,
        ),
        demanda(
            "007",
            "Pintura da fachada descascando",
            ("estrutural", "Estrutural"),
            data(2025, 3, 10),
            Media,
            EmAnalise,
            "Pintura da fachada principal está descascando em vários pontos.",
            "Fachada principal",
            0,
        ),
        demanda(
            "008",
            "Infiltração no teto do 5º andar",
            ("hidraulica", "Hidráulica"),
            data(2025, 3, 10),
            Alta,
            EmAndamento,
            "Infiltração no teto do corredor do 5º andar, próximo ao apartamento 502.",
            "Corredor do 5º andar",
            0,
        ),
    ]
}
