// src/services/demanda_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, format},
    db::DemandaRepository,
    models::{
        catalogo::{Catalogo, Tema},
        demanda::{
            Criticidade, Demanda, DemandaStatus, DetalheDemanda, EditarDemandaPayload, FiltroDemandas,
            ItemDemanda, NovaDemandaPayload, PaginaDemandas, Paginacao,
        },
    },
};

pub const ITENS_POR_PAGINA: usize = 5;

// Opções "todas" dos selects de filtro
const SENTINELAS_FILTRO: [&str; 3] = ["Todos os Status", "Todas as Categorias", "Todas as Criticidades"];

#[derive(Clone)]
pub struct DemandaService {
    repo: DemandaRepository,
    catalogo: Arc<Catalogo>,
}

impl DemandaService {
    pub fn new(repo: DemandaRepository, catalogo: Arc<Catalogo>) -> Self {
        Self { repo, catalogo }
    }

    pub async fn seed_defaults(&self) -> Result<bool, AppError> {
        self.repo.seed_if_absent().await
    }

    // =========================================================================
    //  LISTAGEM
    // =========================================================================

    pub async fn listar(&self, filtro: &FiltroDemandas) -> PaginaDemandas {
        let demandas = self.repo.list_all().await;
        montar_pagina(&demandas, filtro, &self.catalogo)
    }

    pub async fn detalhar(&self, id: &str) -> Result<DetalheDemanda, AppError> {
        let demanda = self
            .repo
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::DemandaNaoEncontrada(id.to_string()))?;

        Ok(DetalheDemanda {
            data_formatada: format::formatar_data(demanda.data),
            data_resolucao_formatada: demanda.data_resolucao.map(format::formatar_data),
            criticidade_label: self.catalogo.rotulo_criticidade(&demanda.criticidade).map(String::from),
            status_label: self.catalogo.rotulo_status(&demanda.status).map(String::from),
            custo_formatado: format::formatar_custo(demanda.custo),
            demanda,
        })
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    pub async fn criar(&self, payload: NovaDemandaPayload, hoje: NaiveDate) -> Result<Demanda, AppError> {
        validar_nova_demanda(&payload, &self.catalogo)?;

        let categoria = payload.categoria.trim().to_string();
        let categoria_label = self
            .catalogo
            .rotulo_categoria(&categoria)
            .unwrap_or_default()
            .to_string();

        let nova = self
            .repo
            .insert_with(|atuais| Demanda {
                id: proximo_id(atuais),
                titulo: payload.titulo.trim().to_string(),
                categoria,
                categoria_label,
                data: hoje,
                criticidade: Criticidade::from(payload.criticidade.trim().to_string()),
                status: DemandaStatus::Aberta,
                descricao: payload.descricao.trim().to_string(),
                localizacao: payload.localizacao.trim().to_string(),
                custo: Decimal::ZERO,
                data_resolucao: None,
            })
            .await?;

        tracing::info!("📝 Demanda {} registrada: {}", nova.id, nova.titulo);
        Ok(nova)
    }

    // =========================================================================
    //  EDIÇÃO
    // =========================================================================

    pub async fn editar(
        &self,
        id: &str,
        payload: EditarDemandaPayload,
        hoje: NaiveDate,
    ) -> Result<Demanda, AppError> {
        let novo_status = validar_edicao(&payload, &self.catalogo)?;

        let campos = payload.campos;
        let categoria = campos.categoria.trim().to_string();
        let categoria_label = self
            .catalogo
            .rotulo_categoria(&categoria)
            .unwrap_or_default()
            .to_string();

        let editada = self
            .repo
            .update_with(id, |demanda| {
                demanda.titulo = campos.titulo.trim().to_string();
                demanda.categoria = categoria;
                demanda.categoria_label = categoria_label;
                demanda.criticidade = Criticidade::from(campos.criticidade.trim().to_string());
                demanda.descricao = campos.descricao.trim().to_string();
                demanda.localizacao = campos.localizacao.trim().to_string();
                if let Some(novo) = novo_status {
                    aplicar_status(demanda, novo, hoje);
                }
            })
            .await?
            .ok_or_else(|| AppError::DemandaNaoEncontrada(id.to_string()))?;

        tracing::info!("✏️ Demanda {} editada: {}", editada.id, editada.titulo);
        Ok(editada)
    }

    // =========================================================================
    //  TRANSIÇÃO DE STATUS
    // =========================================================================

    pub async fn atualizar_status(
        &self,
        id: &str,
        codigo_status: &str,
        hoje: NaiveDate,
    ) -> Result<Demanda, AppError> {
        let novo = DemandaStatus::parse(codigo_status.trim())
            .ok_or_else(|| AppError::StatusInvalido(codigo_status.to_string()))?;

        let atualizada = self
            .repo
            .update_with(id, |demanda| aplicar_status(demanda, novo, hoje))
            .await?
            .ok_or_else(|| AppError::DemandaNaoEncontrada(id.to_string()))?;

        tracing::info!("🔄 Demanda {} agora está '{}'", atualizada.id, atualizada.status.codigo());
        Ok(atualizada)
    }
}

// ---
// Funções puras (sem acesso ao store)
// ---

fn filtro_ativo(valor: &Option<String>) -> Option<&str> {
    valor
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !SENTINELAS_FILTRO.contains(v))
}

pub fn passa_no_filtro(demanda: &Demanda, filtro: &FiltroDemandas) -> bool {
    if let Some(status) = filtro_ativo(&filtro.status) {
        if demanda.status.codigo() != status {
            return false;
        }
    }
    if let Some(categoria) = filtro_ativo(&filtro.categoria) {
        if demanda.categoria != categoria {
            return false;
        }
    }
    if let Some(criticidade) = filtro_ativo(&filtro.criticidade) {
        if demanda.criticidade.codigo() != criticidade {
            return false;
        }
    }
    if let Some(termo) = filtro_ativo(&filtro.busca) {
        let termo = termo.to_lowercase();
        if !demanda.titulo.to_lowercase().contains(&termo) && !demanda.id.to_lowercase().contains(&termo) {
            return false;
        }
    }
    true
}

/// Página pedida é limitada a `[1, max(total_paginas, 1)]`.
pub fn paginar(total_itens: usize, pagina: Option<u32>) -> Paginacao {
    let total_paginas = total_itens.div_ceil(ITENS_POR_PAGINA) as u32;
    let pagina_atual = pagina.unwrap_or(1).clamp(1, total_paginas.max(1));

    Paginacao {
        pagina_atual,
        total_paginas,
        total_itens,
        itens_por_pagina: ITENS_POR_PAGINA,
        anterior_desabilitado: pagina_atual == 1,
        proxima_desabilitado: pagina_atual >= total_paginas,
        paginas: (1..=total_paginas).collect(),
    }
}

pub fn item_demanda(demanda: &Demanda, catalogo: &Catalogo, tema: Tema) -> ItemDemanda {
    ItemDemanda {
        id: demanda.id.clone(),
        titulo: demanda.titulo.clone(),
        categoria_label: demanda.categoria_label.clone(),
        data: format::formatar_data(demanda.data),
        criticidade_label: catalogo.rotulo_criticidade(&demanda.criticidade).map(String::from),
        criticidade_classe: catalogo.classe_criticidade(tema, &demanda.criticidade).map(String::from),
        status_label: catalogo.rotulo_status(&demanda.status).map(String::from),
        status_classe: catalogo.classe_status(tema, &demanda.status).map(String::from),
    }
}

pub fn montar_pagina(demandas: &[Demanda], filtro: &FiltroDemandas, catalogo: &Catalogo) -> PaginaDemandas {
    let filtradas: Vec<&Demanda> = demandas.iter().filter(|d| passa_no_filtro(d, filtro)).collect();
    let paginacao = paginar(filtradas.len(), filtro.pagina);

    let inicio = (paginacao.pagina_atual as usize - 1) * ITENS_POR_PAGINA;
    let itens: Vec<ItemDemanda> = filtradas
        .iter()
        .skip(inicio)
        .take(ITENS_POR_PAGINA)
        .map(|d| item_demanda(d, catalogo, Tema::Listagem))
        .collect();

    let mensagem = itens
        .is_empty()
        .then(|| "Nenhuma demanda encontrada com os filtros selecionados.".to_string());

    PaginaDemandas { itens, paginacao, mensagem }
}

// Entrar em `resolvida` grava a data (se ainda não houver); sair dela apaga.
fn aplicar_status(demanda: &mut Demanda, novo: DemandaStatus, hoje: NaiveDate) {
    if novo == DemandaStatus::Resolvida {
        demanda.data_resolucao.get_or_insert(hoje);
    } else {
        demanda.data_resolucao = None;
    }
    demanda.status = novo;
}

/// Maior ID numérico + 1, com 3 dígitos. IDs não numéricos são ignorados.
pub fn proximo_id(demandas: &[Demanda]) -> String {
    let maior = demandas
        .iter()
        .filter_map(|d| d.id.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{:03}", maior.saturating_add(1))
}

// Regras do payload + categoria existente no catálogo, num único conjunto de erros.
pub fn validar_nova_demanda(payload: &NovaDemandaPayload, catalogo: &Catalogo) -> Result<(), ValidationErrors> {
    let mut errors = match payload.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    let categoria = payload.categoria.trim();
    if !categoria.is_empty() && catalogo.rotulo_categoria(categoria).is_none() {
        let mut err = ValidationError::new("categoria");
        err.message = Some("Categoria desconhecida.".into());
        errors.add("categoria", err);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// Regras do cadastro mais o status opcional. Status em branco mantém o atual.
pub fn validar_edicao(
    payload: &EditarDemandaPayload,
    catalogo: &Catalogo,
) -> Result<Option<DemandaStatus>, ValidationErrors> {
    let mut errors = match validar_nova_demanda(&payload.campos, catalogo) {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    let codigo = payload.status.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let status = codigo.and_then(DemandaStatus::parse);
    if codigo.is_some() && status.is_none() {
        let mut err = ValidationError::new("status");
        err.message = Some("Status desconhecido.".into());
        errors.add("status", err);
    }

    if errors.is_empty() { Ok(status) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DemandaRepository, MemoryStore};
    use crate::db::demanda_repo::demandas_iniciais;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn service() -> DemandaService {
        let repo = DemandaRepository::new(Arc::new(MemoryStore::new()));
        DemandaService::new(repo, Arc::new(Catalogo::padrao()))
    }

    fn payload_valido() -> NovaDemandaPayload {
        NovaDemandaPayload {
            titulo: "Portão da garagem travando".into(),
            categoria: "seguranca".into(),
            criticidade: "alta".into(),
            descricao: "Trava na metade do curso.".into(),
            localizacao: "Garagem".into(),
        }
    }

    fn filtro() -> FiltroDemandas {
        FiltroDemandas::default()
    }

    #[test]
    fn filtro_por_status_e_categoria() {
        let demandas = demandas_iniciais();
        let f = FiltroDemandas {
            status: Some("resolvida".into()),
            categoria: Some("hidraulica".into()),
            ..filtro()
        };
        let ids: Vec<&str> = demandas.iter().filter(|d| passa_no_filtro(d, &f)).map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["002"]);
    }

    #[test]
    fn busca_ignora_maiusculas_e_olha_o_id() {
        let demandas = demandas_iniciais();
        let por_titulo = FiltroDemandas { busca: Some("LÂMPADAS".into()), ..filtro() };
        assert_eq!(demandas.iter().filter(|d| passa_no_filtro(d, &por_titulo)).count(), 1);

        let por_id = FiltroDemandas { busca: Some("00".into()), ..filtro() };
        assert_eq!(demandas.iter().filter(|d| passa_no_filtro(d, &por_id)).count(), 8);
    }

    #[test]
    fn sentinelas_e_vazios_nao_filtram() {
        let demandas = demandas_iniciais();
        let f = FiltroDemandas {
            status: Some("Todos os Status".into()),
            categoria: Some("".into()),
            criticidade: Some("Todas as Criticidades".into()),
            busca: Some("  ".into()),
            pagina: None,
        };
        assert!(demandas.iter().all(|d| passa_no_filtro(d, &f)));
    }

    #[test]
    fn paginacao_nos_limites() {
        let p = paginar(8, None);
        assert_eq!(p.total_paginas, 2);
        assert_eq!(p.paginas, vec![1, 2]);
        assert!(p.anterior_desabilitado);
        assert!(!p.proxima_desabilitado);

        let ultima = paginar(8, Some(2));
        assert!(!ultima.anterior_desabilitado);
        assert!(ultima.proxima_desabilitado);

        // Página além do fim é trazida para a última
        assert_eq!(paginar(8, Some(9)).pagina_atual, 2);
        assert_eq!(paginar(8, Some(0)).pagina_atual, 1);
    }

    #[test]
    fn paginacao_sem_itens() {
        let p = paginar(0, Some(3));
        assert_eq!(p.total_paginas, 0);
        assert_eq!(p.pagina_atual, 1);
        assert!(p.paginas.is_empty());
        assert!(p.anterior_desabilitado && p.proxima_desabilitado);
    }

    #[test]
    fn paginas_sempre_igual_ao_teto() {
        for total in 0..=23 {
            let p = paginar(total, None);
            assert_eq!(p.total_paginas as usize, total.div_ceil(5));
            assert_eq!(p.paginas.len(), p.total_paginas as usize);
        }
    }

    #[test]
    fn segunda_pagina_traz_o_resto() {
        let demandas = demandas_iniciais();
        let pagina = montar_pagina(&demandas, &FiltroDemandas { pagina: Some(2), ..filtro() }, &Catalogo::padrao());
        let ids: Vec<&str> = pagina.itens.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["006", "007", "008"]);
        assert!(pagina.mensagem.is_none());
        assert_eq!(pagina.itens[0].status_classe.as_deref(), Some("badge-open"));
        assert_eq!(pagina.itens[0].data, "12/03/2025");
    }

    #[test]
    fn sem_resultado_tem_mensagem() {
        let demandas = demandas_iniciais();
        let pagina = montar_pagina(
            &demandas,
            &FiltroDemandas { busca: Some("elevador quebrado".into()), ..filtro() },
            &Catalogo::padrao(),
        );
        assert!(pagina.itens.is_empty());
        assert_eq!(
            pagina.mensagem.as_deref(),
            Some("Nenhuma demanda encontrada com os filtros selecionados.")
        );
    }

    #[test]
    fn proximo_id_usa_o_maior() {
        assert_eq!(proximo_id(&[]), "001");

        let mut demandas = demandas_iniciais();
        assert_eq!(proximo_id(&demandas), "009");

        // Mesmo fora de ordem, não repete ID
        demandas.swap(0, 7);
        demandas[7].id = "012".into();
        assert_eq!(proximo_id(&demandas), "013");
    }

    #[test]
    fn proximo_id_passa_de_tres_digitos() {
        let mut demandas = demandas_iniciais();
        demandas[0].id = "999".into();
        assert_eq!(proximo_id(&demandas), "1000");
    }

    #[test]
    fn proximo_id_no_limite_nao_estoura() {
        let mut demandas = demandas_iniciais();
        demandas[0].id = u64::MAX.to_string();
        assert_eq!(proximo_id(&demandas), u64::MAX.to_string());
    }

    #[test]
    fn edicao_valida_status_junto_com_os_campos() {
        let catalogo = Catalogo::padrao();

        let sem_status = EditarDemandaPayload { campos: payload_valido(), status: Some("  ".into()) };
        assert_eq!(validar_edicao(&sem_status, &catalogo).unwrap(), None);

        let resolvida = EditarDemandaPayload { campos: payload_valido(), status: Some("resolvida".into()) };
        assert_eq!(validar_edicao(&resolvida, &catalogo).unwrap(), Some(DemandaStatus::Resolvida));

        let invalida = EditarDemandaPayload {
            campos: NovaDemandaPayload { localizacao: "".into(), ..payload_valido() },
            status: Some("pausada".into()),
        };
        let errors = validar_edicao(&invalida, &catalogo).unwrap_err();
        let campos = errors.field_errors();
        assert!(campos.contains_key("status"));
        assert!(campos.contains_key("localizacao"));
    }

    #[test]
    fn categoria_fora_do_catalogo_e_rejeitada() {
        let payload = NovaDemandaPayload { categoria: "jardinagem".into(), ..payload_valido() };
        let errors = validar_nova_demanda(&payload, &Catalogo::padrao()).unwrap_err();
        assert!(errors.field_errors().contains_key("categoria"));
    }

    #[tokio::test]
    async fn criar_anexa_uma_demanda_aberta() {
        let service = service();
        service.seed_defaults().await.unwrap();
        let hoje = data(2025, 4, 20);

        let nova = service.criar(payload_valido(), hoje).await.unwrap();

        assert_eq!(nova.id, "009");
        assert_eq!(nova.status, DemandaStatus::Aberta);
        assert_eq!(nova.custo, Decimal::ZERO);
        assert_eq!(nova.data, hoje);
        assert_eq!(nova.categoria_label, "Segurança");
        assert_eq!(service.repo.list_all().await.len(), 9);
    }

    #[tokio::test]
    async fn criar_invalido_nao_grava_nada() {
        let service = service();
        service.seed_defaults().await.unwrap();

        let payload = NovaDemandaPayload { titulo: "".into(), descricao: " ".into(), ..payload_valido() };
        let err = service.criar(payload, data(2025, 4, 20)).await.unwrap_err();

        match err {
            AppError::ValidationError(errors) => {
                let campos = errors.field_errors();
                assert!(campos.contains_key("titulo"));
                assert!(campos.contains_key("descricao"));
            }
            outro => panic!("erro inesperado: {outro:?}"),
        }
        assert_eq!(service.repo.list_all().await.len(), 8);
    }

    #[tokio::test]
    async fn detalhe_inexistente() {
        let service = service();
        service.seed_defaults().await.unwrap();
        assert!(matches!(service.detalhar("404").await, Err(AppError::DemandaNaoEncontrada(_))));

        let detalhe = service.detalhar("005").await.unwrap();
        assert_eq!(detalhe.custo_formatado, "R$ 420.00");
        assert_eq!(detalhe.status_label.as_deref(), Some("Resolvida"));
    }

    #[tokio::test]
    async fn editar_troca_campos_e_rotulo_da_categoria() {
        let service = service();
        service.seed_defaults().await.unwrap();
        let hoje = data(2025, 4, 20);

        let payload = EditarDemandaPayload {
            campos: NovaDemandaPayload {
                titulo: " Interfone do 302 sem áudio ".into(),
                categoria: "areas-comuns".into(),
                ..payload_valido()
            },
            status: Some("resolvida".into()),
        };
        let editada = service.editar("006", payload, hoje).await.unwrap();

        assert_eq!(editada.id, "006");
        assert_eq!(editada.titulo, "Interfone do 302 sem áudio");
        assert_eq!(editada.categoria_label, "Áreas Comuns");
        assert_eq!(editada.criticidade, Criticidade::Alta);
        assert_eq!(editada.status, DemandaStatus::Resolvida);
        assert_eq!(editada.data_resolucao, Some(hoje));
        // A data de abertura não muda
        assert_eq!(editada.data, data(2025, 3, 12));
        assert_eq!(service.repo.find_by_id("006").await, Some(editada));
        assert_eq!(service.repo.list_all().await.len(), 8);
    }

    #[tokio::test]
    async fn editar_sem_status_mantem_o_atual() {
        let service = service();
        service.seed_defaults().await.unwrap();

        let payload = EditarDemandaPayload { campos: payload_valido(), status: None };
        let editada = service.editar("002", payload, data(2025, 4, 20)).await.unwrap();
        assert_eq!(editada.status, DemandaStatus::Resolvida);

        let payload = EditarDemandaPayload { campos: payload_valido(), status: None };
        assert!(matches!(
            service.editar("999", payload, data(2025, 4, 20)).await,
            Err(AppError::DemandaNaoEncontrada(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn criacoes_concorrentes_nao_repetem_id_nem_perdem_escrita() {
        let service = service();
        service.seed_defaults().await.unwrap();
        let hoje = data(2025, 4, 20);

        let tarefas: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                let payload = NovaDemandaPayload { titulo: format!("Demanda {i}"), ..payload_valido() };
                tokio::spawn(async move { service.criar(payload, hoje).await })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for tarefa in tarefas {
            let nova = tarefa.await.unwrap().unwrap();
            assert!(ids.insert(nova.id), "ID repetido");
        }

        assert_eq!(ids.len(), 20);
        let gravadas = service.repo.list_all().await;
        assert_eq!(gravadas.len(), 8 + 20);
        for n in 9..=28 {
            assert!(ids.contains(&format!("{n:03}")));
        }
    }

    #[tokio::test]
    async fn resolver_marca_a_data_e_reabrir_limpa() {
        let service = service();
        service.seed_defaults().await.unwrap();
        let hoje = data(2025, 4, 20);

        let resolvida = service.atualizar_status("006", "resolvida", hoje).await.unwrap();
        assert_eq!(resolvida.data_resolucao, Some(hoje));

        let reaberta = service.atualizar_status("006", "em-andamento", hoje).await.unwrap();
        assert_eq!(reaberta.data_resolucao, None);

        assert!(matches!(
            service.atualizar_status("006", "arquivada", hoje).await,
            Err(AppError::StatusInvalido(_))
        ));
        assert!(matches!(
            service.atualizar_status("999", "resolvida", hoje).await,
            Err(AppError::DemandaNaoEncontrada(_))
        ));
    }
}
