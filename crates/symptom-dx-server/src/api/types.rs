//! Shared state handed to every endpoint.

use std::sync::Arc;

use symptom_dx_core::DiagnosisService;
use symptom_dx_extract::{KeywordExtractor, SymptomVocabulary};

/// Cloned per request by axum; everything inside is shared read-only.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<DiagnosisService>,
    pub extractor: Arc<KeywordExtractor>,
    /// RFC 3339 startup time, reported by the health endpoint.
    pub started_at: String,
}

impl ApiContext {
    pub fn new(service: Arc<DiagnosisService>, extractor: KeywordExtractor) -> Self {
        Self {
            service,
            extractor: Arc::new(extractor),
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Context whose extractor only emits symptoms the loaded model accepts.
    ///
    /// Falls back to the default vocabulary when the classifier does not
    /// publish one.
    pub fn from_service(service: Arc<DiagnosisService>) -> Self {
        let vocabulary = service.symptom_vocabulary();
        let extractor = if vocabulary.is_empty() {
            KeywordExtractor::default()
        } else {
            tracing::info!(terms = vocabulary.len(), "Extractor vocabulary taken from model");
            KeywordExtractor::new(SymptomVocabulary::new(vocabulary))
        };
        Self::new(service, extractor)
    }
}
