//! Symptom extraction from free text and from LLM output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vocabulary::SymptomVocabulary;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Extractor output, also the shape the LLM is asked to return.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedSymptoms {
    pub symptoms: Vec<String>,
}

impl ExtractedSymptoms {
    /// Snap every entry onto the vocabulary; unmatched entries are dropped,
    /// duplicates collapse to their first occurrence.
    pub fn snapped(&self, vocabulary: &SymptomVocabulary) -> ExtractedSymptoms {
        let mut symptoms: Vec<String> = Vec::new();
        for raw in &self.symptoms {
            if let Some(term) = vocabulary.snap(raw) {
                if !symptoms.iter().any(|s| s == term) {
                    symptoms.push(term.to_string());
                }
            }
        }
        ExtractedSymptoms { symptoms }
    }
}

/// Parse LLM output JSON into extracted symptoms.
pub fn parse_extraction_output(raw: &str) -> ExtractionResult<ExtractedSymptoms> {
    // Models sometimes wrap the JSON in prose
    let json_start = raw.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = raw.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let output: ExtractedSymptoms = serde_json::from_str(&raw[json_start..=json_end])?;
    Ok(output)
}

/// Offline extractor: finds vocabulary terms mentioned in the text.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    vocabulary: SymptomVocabulary,
}

impl KeywordExtractor {
    pub fn new(vocabulary: SymptomVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    /// Terms found in `text`, ordered by first occurrence.
    ///
    /// Underscores in terms are read as spaces; matches must sit on word
    /// boundaries so "coma" is not found inside "carcinoma".
    pub fn extract(&self, text: &str) -> ExtractedSymptoms {
        let haystack = text.to_lowercase();

        let mut found: Vec<(usize, &str)> = self
            .vocabulary
            .terms()
            .iter()
            .filter_map(|term| {
                let spoken = term.replace('_', " ");
                find_phrase(&haystack, &spoken)
                    .or_else(|| find_phrase(&haystack, term))
                    .map(|pos| (pos, term.as_str()))
            })
            .collect();

        // Longer terms first at equal positions, then drop terms nested in an
        // earlier, longer match ("pain" inside "chest pain" style overlaps).
        found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())));

        let mut symptoms = Vec::new();
        let mut covered_until = 0;
        for (pos, term) in found {
            if pos < covered_until {
                continue;
            }
            covered_until = pos + term.len();
            symptoms.push(term.to_string());
        }

        ExtractedSymptoms { symptoms }
    }
}

/// Byte position of the first word-bounded occurrence of `needle`.
fn find_phrase(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }

    haystack.match_indices(needle).map(|(pos, _)| pos).find(|&pos| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extraction_output() {
        let json = r#"{"symptoms":["headache","high_fever"]}"#;

        let output = parse_extraction_output(json).unwrap();
        assert_eq!(output.symptoms, vec!["headache", "high_fever"]);
    }

    #[test]
    fn test_parse_extraction_output_with_prefix() {
        let raw = r#"Here are the symptoms I found:
{"symptoms": ["cough"]}
Let me know if you need anything else."#;

        let output = parse_extraction_output(raw).unwrap();
        assert_eq!(output.symptoms, vec!["cough"]);
    }

    #[test]
    fn test_parse_extraction_output_errors() {
        assert!(matches!(
            parse_extraction_output("no json here"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_extraction_output("} backwards {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_extraction_output(r#"{"symptoms": "cough"}"#),
            Err(ExtractionError::JsonParse(_))
        ));
    }

    #[test]
    fn test_snapped_maps_and_dedups() {
        let output = ExtractedSymptoms {
            symptoms: vec![
                " High Fever".into(),
                "head ache".into(),
                "high_fever".into(),
                "broken leg".into(),
            ],
        };

        let snapped = output.snapped(&SymptomVocabulary::default());
        assert_eq!(snapped.symptoms, vec!["high_fever", "headache"]);
    }

    #[test]
    fn test_keyword_extractor() {
        let extractor = KeywordExtractor::default();
        let output = extractor.extract("I have a headache and high fever");

        assert_eq!(output.symptoms, vec!["headache", "high_fever"]);
    }

    #[test]
    fn test_keyword_extractor_order_and_case() {
        let extractor = KeywordExtractor::default();
        let output = extractor.extract("Nausea since Monday. Also VOMITING, and some Chills.");

        assert_eq!(output.symptoms, vec!["nausea", "vomiting", "chills"]);
    }

    #[test]
    fn test_keyword_extractor_word_boundaries() {
        let extractor = KeywordExtractor::new(SymptomVocabulary::new(["coma", "cough"]));

        assert!(extractor.extract("history of carcinoma").symptoms.is_empty());
        assert_eq!(extractor.extract("a dry cough.").symptoms, vec!["cough"]);
    }

    #[test]
    fn test_keyword_extractor_prefers_longer_overlap() {
        let extractor = KeywordExtractor::new(SymptomVocabulary::new(["pain", "chest_pain", "back_pain"]));
        let output = extractor.extract("sharp chest pain and back pain");

        assert_eq!(output.symptoms, vec!["chest_pain", "back_pain"]);
    }

    #[test]
    fn test_keyword_extractor_nothing_found() {
        let extractor = KeywordExtractor::default();
        assert_eq!(extractor.extract("I feel fine"), ExtractedSymptoms::default());
    }

    #[test]
    fn test_find_phrase() {
        assert_eq!(find_phrase("a cough", "cough"), Some(2));
        assert_eq!(find_phrase("coughing", "cough"), None);
        assert_eq!(find_phrase("coughing, cough", "cough"), Some(10));
        assert_eq!(find_phrase("anything", ""), None);
    }
}
