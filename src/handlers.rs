pub mod catalogo;
pub mod dashboard;
pub mod demandas;
