//! Prompts for LLM-backed symptom extraction.

use crate::vocabulary::SymptomVocabulary;

/// System prompt listing the vocabulary and the required output shape.
pub fn system_prompt(vocabulary: &SymptomVocabulary) -> String {
    format!(
        r#"You are a medical symptom analyzer. Your task is to extract symptoms from the user responses and match them to the following predefined list of symptoms: {}

If a mentioned symptom is similar to one in the list, map it to the closest matching term.

Return the symptoms in this JSON format:
{{
  "symptoms": ["symptom1", "symptom2", ...]
}}

If no symptoms are detected, return:
{{
  "symptoms": []
}}"#,
        vocabulary.terms().join(", ")
    )
}

/// User prompt for a single patient response.
pub fn make_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract all symptoms from this patient response:

"{}"

Return only a JSON object with a "symptoms" array of terms from the list."#,
        text
    )
}

/// Few-shot examples for better extraction accuracy.
pub const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "I've been sneezing all day and my eyes keep watering",
        r#"{"symptoms":["continuous_sneezing","watering_from_eyes"]}"#,
    ),
    (
        "My skin itches and there's a rash on my arms",
        r#"{"symptoms":["itching","skin_rash"]}"#,
    ),
    (
        "I feel fine, just checking in",
        r#"{"symptoms":[]}"#,
    ),
];

/// Build a complete chat prompt with system context and optional examples.
pub fn build_full_prompt(vocabulary: &SymptomVocabulary, text: &str, include_examples: bool) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(&system_prompt(vocabulary));
    prompt.push_str("\n<|end|>\n");

    if include_examples {
        for (input, output) in FEW_SHOT_EXAMPLES {
            prompt.push_str("<|user|>\n");
            prompt.push_str(&make_extraction_prompt(input));
            prompt.push_str("\n<|end|>\n");
            prompt.push_str("<|assistant|>\n");
            prompt.push_str(output);
            prompt.push_str("\n<|end|>\n");
        }
    }

    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_extraction_prompt(text));
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}
