pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod demanda_service;
pub use demanda_service::DemandaService;
