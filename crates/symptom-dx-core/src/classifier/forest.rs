//! Decision-tree ensemble loaded from a JSON artifact.
//!
//! Feature encoding is positional: entry `i` of the feature vector holds the
//! code of the `i`-th reported symptom, remaining entries are `0.0`. Each tree
//! votes for one class; the majority wins, ties go to the lowest class index.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{
    ClassifierInfo, ModelLoadError, PredictionError, PredictionResult, SymptomClassifier,
};
use crate::models::SymptomSet;

/// On-disk model format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestArtifact {
    /// Length of the feature vector
    pub n_features: usize,
    /// Symptom identifier → numeric code
    pub symptom_codes: HashMap<String, f64>,
    /// Class labels, indexed by leaf `class`
    pub classes: Vec<String>,
    pub estimators: Vec<DecisionTree>,
}

/// A single tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

impl DecisionTree {
    /// Walk from the root to a leaf. Assumes a validated tree.
    fn leaf_class(&self, x: &[f64]) -> usize {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
                TreeNode::Leaf { class } => return class,
            }
        }
    }

    fn validate(&self, tree_idx: usize, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {} has no nodes", tree_idx));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "tree {} node {} splits on feature {} (n_features = {})",
                            tree_idx, idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree {} node {} has a non-finite threshold", tree_idx, idx));
                    }
                    // Children after their parent: traversal always terminates.
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "tree {} node {} has invalid child index {}",
                                tree_idx, idx, child
                            ));
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if class >= n_classes {
                        return Err(format!(
                            "tree {} node {} points at class {} (n_classes = {})",
                            tree_idx, idx, class, n_classes
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Immutable, reentrant decision-forest classifier.
#[derive(Debug, Clone)]
pub struct ForestModel {
    artifact: ForestArtifact,
    info: ClassifierInfo,
}

impl ForestModel {
    /// Load and validate an artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_bytes(&bytes)?;

        tracing::info!(
            path = %path.display(),
            sha256 = %model.info.sha256,
            classes = model.info.n_classes,
            features = model.info.n_features,
            estimators = model.info.n_estimators,
            "Classifier artifact loaded"
        );

        Ok(model)
    }

    /// Parse and validate an artifact from raw JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let artifact: ForestArtifact = serde_json::from_slice(bytes)?;
        Self::build(artifact, fingerprint(bytes))
    }

    /// Validate an in-memory artifact. The fingerprint covers its JSON form.
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelLoadError> {
        let bytes = serde_json::to_vec(&artifact)?;
        Self::build(artifact, fingerprint(&bytes))
    }

    fn build(mut artifact: ForestArtifact, sha256: String) -> Result<Self, ModelLoadError> {
        artifact.symptom_codes = validate(&artifact).map_err(ModelLoadError::Invalid)?;

        let info = ClassifierInfo {
            sha256,
            n_features: artifact.n_features,
            n_classes: artifact.classes.len(),
            n_estimators: artifact.estimators.len(),
        };

        Ok(Self { artifact, info })
    }

    /// Build the positional feature vector for one sample.
    pub fn encode(&self, symptoms: &SymptomSet) -> PredictionResult<Vec<f64>> {
        if symptoms.is_empty() {
            return Err(PredictionError::EmptyInput);
        }
        if symptoms.len() > self.artifact.n_features {
            return Err(PredictionError::Dimensionality {
                expected: self.artifact.n_features,
                got: symptoms.len(),
            });
        }

        let mut x = vec![0.0; self.artifact.n_features];
        for (position, entry) in symptoms.entries().iter().enumerate() {
            x[position] = self.encode_entry(position, entry)?;
        }
        Ok(x)
    }

    fn encode_entry(&self, position: usize, entry: &Value) -> PredictionResult<f64> {
        match entry {
            Value::String(name) => self
                .artifact
                .symptom_codes
                .get(&normalize_symptom(name))
                .copied()
                .ok_or_else(|| PredictionError::UnknownSymptom(name.clone())),
            Value::Number(n) => n.as_f64().ok_or_else(|| PredictionError::MalformedFeature {
                position,
                value: n.to_string(),
            }),
            other => Err(PredictionError::MalformedFeature {
                position,
                value: other.to_string(),
            }),
        }
    }

    /// Majority vote over all trees; ties go to the lowest class index.
    fn vote(&self, x: &[f64]) -> usize {
        let mut counts = vec![0usize; self.artifact.classes.len()];
        for tree in &self.artifact.estimators {
            counts[tree.leaf_class(x)] += 1;
        }

        let mut best = 0;
        for (class, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = class;
            }
        }
        best
    }
}

impl SymptomClassifier for ForestModel {
    fn predict(&self, symptoms: &SymptomSet) -> PredictionResult<String> {
        let x = self.encode(symptoms)?;
        let class = self.vote(&x);
        Ok(self.artifact.classes[class].clone())
    }

    fn info(&self) -> Option<ClassifierInfo> {
        Some(self.info.clone())
    }

    /// Symptom identifiers the model can encode, sorted.
    fn vocabulary(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifact.symptom_codes.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

/// Check the artifact and return its symptom codes keyed by normalized name.
///
/// Names that normalize to the same key must carry the same code.
fn validate(artifact: &ForestArtifact) -> Result<HashMap<String, f64>, String> {
    if artifact.n_features == 0 {
        return Err("n_features must be positive".into());
    }
    if artifact.classes.is_empty() {
        return Err("no classes".into());
    }
    if artifact.estimators.is_empty() {
        return Err("no estimators".into());
    }

    let mut codes: HashMap<String, f64> = HashMap::with_capacity(artifact.symptom_codes.len());
    for (name, &code) in &artifact.symptom_codes {
        if !code.is_finite() {
            return Err(format!("symptom '{}' has a non-finite code", name));
        }
        let key = normalize_symptom(name);
        match codes.get(&key) {
            Some(&existing) if existing != code => {
                return Err(format!("symptom '{}' has conflicting codes", key));
            }
            Some(_) => {}
            None => {
                codes.insert(key, code);
            }
        }
    }

    for (idx, tree) in artifact.estimators.iter().enumerate() {
        tree.validate(idx, artifact.n_features, artifact.classes.len())?;
    }

    Ok(codes)
}

fn normalize_symptom(name: &str) -> String {
    name.trim().to_lowercase()
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
