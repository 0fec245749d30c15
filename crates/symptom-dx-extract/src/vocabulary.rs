//! Symptom vocabulary the classifier was trained on.
//!
//! Terms are canonical identifiers: trimmed, lower-cased, words joined by
//! underscores (a few historical entries keep an inner space).

use std::collections::HashSet;

use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for snapping a near-miss onto a term.
pub const SNAP_THRESHOLD: f64 = 0.88;

/// Default vocabulary, in the order the front end lists it.
pub const DEFAULT_SYMPTOMS: &[&str] = &[
    "unsteadiness", "puffy_face_and_eyes", "brittle_nails", "enlarged_thyroid",
    "muscle_weakness", "redness_of_eyes", "fluid_overload", "bloody_stool", "cough",
    "yellowing_of_eyes", "high_fever", "irregular_sugar_level", "swollen_blood_vessels",
    "headache", "pain_in_anal_region", "irritability", "extra_marital_contacts", "shivering",
    "diarrhoea", "irritation_in_anus", "weakness_in_limbs", "movement_stiffness", "obesity",
    "itching", "swelling_of_stomach", "acute_liver_failure", "blood_in_sputum",
    "patches_in_throat", "dischromic patches", "ulcers_on_tongue", "excessive_hunger",
    "muscle_pain", "palpitations", "stomach_bleeding", "yellow_crust_ooze",
    "receiving_unsterile_injections", "skin_rash", "joint_pain", "skin_peeling",
    "small_dents_in_nails", "acidity", "cramps", "red_sore_around_nose", "polyuria",
    "bladder_discomfort", "congestion", "loss_of_balance", "altered_sensorium", "mood_swings",
    "coma", "weight_gain", "sunken_eyes", "pus_filled_pimples", "bruising", "hip_joint_pain",
    "restlessness", "depression", "continuous_sneezing", "chest_pain", "sinus_pressure",
    "muscle_wasting", "yellowish_skin", "spinning_movements", "scurring",
    "visual_disturbances", "runny_nose", "back_pain", "swelling_joints", "blister",
    "foul_smell_of urine", "stomach_pain", "fast_heart_rate", "dark_urine", "indigestion",
    "loss_of_appetite", "distention_of_abdomen", "painful_walking", "yellow_urine",
    "increased_appetite", "breathlessness", "drying_and_tingling_lips", "toxic_look(typhos)",
    "receiving_blood_transfusion", "slurred_speech", "blurred_and_distorted_vision", "anxiety",
    "dehydration", "pain_behind_the_eyes", "red_spots_over_body", "knee_pain", "lethargy",
    "sweating", "swollen_legs", "abnormal_menstruation", "fatigue", "swollen_extremeties",
    "inflammatory_nails", "mild_fever", "belly_pain", "abdominal_pain", "loss_of_smell",
    "stiff_neck", "vomiting", "throat_irritation", "family_history", "cold_hands_and_feets",
    "watering_from_eyes", "malaise", "dizziness", "continuous_feel_of_urine",
    "history_of_alcohol_consumption", "phlegm", "nausea", "silver_like_dusting", "chills",
    "constipation", "nodal_skin_eruptions", "blackheads", "swelled_lymph_nodes",
    "prominent_veins_on_calf", "rusty_sputum", "passage_of_gases", "weight_loss",
    "spotting_ urination", "lack_of_concentration", "internal_itching", "neck_pain",
    "pain_during_bowel_movements", "mucoid_sputum", "burning_micturition",
    "weakness_of_one_body_side",];

/// Ordered, de-duplicated set of canonical symptom identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomVocabulary {
    terms: Vec<String>,
    index: HashSet<String>,
}

impl Default for SymptomVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SYMPTOMS.iter().copied())
    }
}

impl SymptomVocabulary {
    /// Build a vocabulary; terms are normalized and de-duplicated, order kept.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self {
            terms: Vec::new(),
            index: HashSet::new(),
        };
        for term in terms {
            let term = normalize_term(term.as_ref());
            if !term.is_empty() && vocab.index.insert(term.clone()) {
                vocab.terms.push(term);
            }
        }
        vocab
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains(&normalize_term(term))
    }

    /// Map a free-form symptom onto the closest vocabulary term.
    ///
    /// Exact matches (after normalization, with spaces read as underscores)
    /// win; otherwise the most similar term at or above [`SNAP_THRESHOLD`].
    pub fn snap(&self, candidate: &str) -> Option<&str> {
        let normalized = normalize_term(candidate);
        if normalized.is_empty() {
            return None;
        }

        let underscored = normalized.split_whitespace().collect::<Vec<_>>().join("_");
        for probe in [&normalized, &underscored] {
            if let Some(term) = self.index.get(probe.as_str()) {
                return Some(term.as_str());
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for term in &self.terms {
            let score = jaro_winkler(&underscored, term);
            if score >= SNAP_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((term.as_str(), score));
            }
        }
        best.map(|(term, _)| term)
    }
}

fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
