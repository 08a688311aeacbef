// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const IDIOMA_PADRAO: &str = "pt";

// Extrator de idioma a partir do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(IDIOMA_PADRAO.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    // "pt-BR" -> "pt"
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            })
            .map(Locale)
            .unwrap_or_default();

        Ok(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extrair(valor: Option<&str>) -> String {
        let mut builder = Request::builder();
        if let Some(v) = valor {
            builder = builder.header(header::ACCEPT_LANGUAGE, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Locale::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn usa_primeiro_idioma_sem_regiao() {
        assert_eq!(extrair(Some("en-US,pt;q=0.8")).await, "en");
        assert_eq!(extrair(Some("pt-BR")).await, "pt");
    }

    #[tokio::test]
    async fn sem_cabecalho_cai_no_portugues() {
        assert_eq!(extrair(None).await, "pt");
    }
}
