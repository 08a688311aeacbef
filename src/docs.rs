// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Demandas do Condomínio",
        description = "Registro, consulta e painel gerencial das demandas de manutenção do condomínio"
    ),
    paths(
        // --- Demandas ---
        handlers::demandas::list_demandas,
        handlers::demandas::get_demanda,
        handlers::demandas::create_demanda,
        handlers::demandas::update_demanda,
        handlers::demandas::update_status,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_indicadores,
        handlers::dashboard::get_graficos,
        handlers::dashboard::get_criticas,

        // --- Catálogo ---
        handlers::catalogo::list_categorias,
    ),
    components(
        schemas(
            // --- Demandas ---
            models::demanda::Demanda,
            models::demanda::ItemDemanda,
            models::demanda::Paginacao,
            models::demanda::PaginaDemandas,
            models::demanda::DetalheDemanda,
            models::demanda::NovaDemandaPayload,
            models::demanda::DemandaCriada,
            models::demanda::EditarDemandaPayload,
            models::demanda::DemandaAtualizada,
            models::demanda::AtualizarStatusPayload,
            models::demanda::StatusAtualizado,
            models::common::Notificacao,
            models::common::TipoNotificacao,

            // --- Dashboard ---
            models::dashboard::Janela,
            models::dashboard::ResumoPeriodo,
            models::dashboard::Variacoes,
            models::dashboard::Indicadores,
            models::dashboard::Tendencia,
            models::dashboard::CartaoIndicador,
            models::dashboard::CartoesIndicadores,
            models::dashboard::TipoGrafico,
            models::dashboard::DatasetGrafico,
            models::dashboard::Grafico,
            models::dashboard::ContagemStatusCategoria,
            models::dashboard::ContagemMesStatus,
            models::dashboard::DadosBrutos,
            models::dashboard::Graficos,
            models::dashboard::DemandasCriticas,
            models::dashboard::Dashboard,

            // --- Catálogo ---
            models::catalogo::Categoria,
        )
    ),
    tags(
        (name = "Demandas", description = "Registro e consulta de demandas"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Catálogo", description = "Categorias aceitas no cadastro")
    )
)]
pub struct ApiDoc;
