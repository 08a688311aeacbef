pub mod catalogo;
pub mod common;
pub mod dashboard;
pub mod demanda;
