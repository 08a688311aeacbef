pub mod store;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub mod demanda_repo;
pub use demanda_repo::DemandaRepository;
