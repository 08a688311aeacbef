// src/db/store.rs
//
// Armazenamento chave-valor persistente. Cada chave guarda um valor JSON; o arquivo
// em disco é um único objeto `{ "<chave>": <valor>, ... }`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};

use crate::common::error::AppError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError>;
}

/// Lê a chave e converte para `T`. Ausente, ilegível ou em formato inesperado: devolve `default`.
pub async fn load<T>(store: &dyn KeyValueStore, key: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    match store.get(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("⚠️ Conteúdo inválido na chave '{}', usando o padrão: {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("⚠️ Falha ao ler a chave '{}', usando o padrão: {}", key, e);
            default
        }
    }
}

/// Igual a `load`, mas conteúdo em formato inesperado vira erro. Para quem vai regravar a chave.
pub async fn try_load<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), AppError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}

// ---
// Arquivo JSON em disco
// ---

pub struct FileStore {
    path: PathBuf,
    // Serializa leitura-modificação-escrita do arquivo
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Option<Map<String, Value>>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Some(Map::new()));
        }
        let document = serde_json::from_str(&raw)?;
        Ok(Some(document))
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        // Escreve ao lado e renomeia, para nunca deixar o arquivo pela metade
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.and_then(|mut doc| doc.remove(key)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut document = match self.read_document().await {
            Ok(document) => document.unwrap_or_default(),
            Err(AppError::SerializationError(e)) => {
                // Não sobrescreve um arquivo que não conseguimos ler: guarda uma cópia antes
                let backup = self.path.with_extension("json.corrompido");
                tracing::warn!(
                    "⚠️ Arquivo de dados ilegível ({}), movendo para {}",
                    e,
                    backup.display()
                );
                tokio::fs::rename(&self.path, &backup).await?;
                Map::new()
            }
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }
}

// ---
// Em memória (testes e execuções descartáveis)
// ---

#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: Value) -> Self {
        Self { values: RwLock::new(HashMap::from([(key.to_string(), value)])) }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_devolve_padrao_quando_ausente() {
        let store = MemoryStore::new();
        let valor: Vec<u32> = load(&store, "numeros", vec![7]).await;
        assert_eq!(valor, vec![7]);
    }

    #[tokio::test]
    async fn load_devolve_padrao_quando_malformado() {
        let store = MemoryStore::with_value("numeros", json!({ "nao": "é lista" }));
        let valor: Vec<u32> = load(&store, "numeros", Vec::new()).await;
        assert!(valor.is_empty());
    }

    #[tokio::test]
    async fn try_load_acusa_conteudo_malformado() {
        let store = MemoryStore::with_value("numeros", json!([1, "dois", 3]));
        let resultado: Result<Option<Vec<u32>>, AppError> = try_load(&store, "numeros").await;
        assert!(matches!(resultado, Err(AppError::SerializationError(_))));

        let ausente: Option<Vec<u32>> = try_load(&store, "outra").await.unwrap();
        assert!(ausente.is_none());
    }

    #[tokio::test]
    async fn save_e_load_em_arquivo() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("dados").join("demandas.json"));

        save(&store, "numeros", &vec![1, 2, 3]).await.unwrap();
        save(&store, "outra", &"x").await.unwrap();

        let numeros: Vec<u32> = load(&store, "numeros", Vec::new()).await;
        assert_eq!(numeros, vec![1, 2, 3]);

        // As duas chaves convivem no mesmo documento
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["outra"], "x");
    }

    #[tokio::test]
    async fn arquivo_corrompido_vira_padrao_e_e_preservado() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demandas.json");
        std::fs::write(&path, "{ isto não é json").unwrap();
        let store = FileStore::new(&path);

        let numeros: Vec<u32> = load(&store, "numeros", vec![0]).await;
        assert_eq!(numeros, vec![0]);

        save(&store, "numeros", &vec![5]).await.unwrap();
        assert!(dir.path().join("demandas.json.corrompido").exists());
        let numeros: Vec<u32> = load(&store, "numeros", Vec::new()).await;
        assert_eq!(numeros, vec![5]);
    }
}
