//! Per-domain classifiers and the class-id to risk-label mapping.

mod forest;

pub use forest::{DecisionTree, ModelError, TreeEnsembleModel, TreeNode};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use super::domain::{Domain, RiskLabel};
use super::features::{FeatureSchema, FeatureVector};

/// Opaque pre-trained model consuming one domain's feature vector.
pub trait RiskClassifier: Send + Sync {
    fn expected_width(&self) -> usize;
    fn predict(&self, features: &[f64]) -> Result<u8, PredictionError>;
}

/// Input rejected by a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("expected {expected} features, received {found}")]
    Width { expected: usize, found: usize },
    #[error("feature {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Test and demo double that always answers with the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClassifier {
    class_id: u8,
    width: usize,
}

impl FixedClassifier {
    pub fn new(class_id: u8, width: usize) -> Self {
        Self { class_id, width }
    }
}

impl RiskClassifier for FixedClassifier {
    fn expected_width(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &[f64]) -> Result<u8, PredictionError> {
        if features.len() != self.width {
            return Err(PredictionError::Width {
                expected: self.width,
                found: features.len(),
            });
        }
        Ok(self.class_id)
    }
}

/// Binds a model to its domain and maps raw class ids onto risk labels.
#[derive(Clone)]
pub struct ClassifierAdapter {
    domain: Domain,
    model: Arc<dyn RiskClassifier>,
}

impl fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("domain", &self.domain)
            .field("expected_width", &self.model.expected_width())
            .finish()
    }
}

impl ClassifierAdapter {
    pub fn new(domain: Domain, model: Arc<dyn RiskClassifier>) -> Self {
        Self { domain, model }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn expected_width(&self) -> usize {
        self.model.expected_width()
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
        if features.domain != self.domain {
            return Err(ClassifierError::DomainMismatch {
                expected: self.domain,
                found: features.domain,
            });
        }
        if features.len() != self.expected_width() {
            return Err(ClassifierError::WidthMismatch {
                domain: self.domain,
                expected: self.expected_width(),
                found: features.len(),
            });
        }

        let class_id = self
            .model
            .predict(features.as_slice())
            .map_err(|source| ClassifierError::Rejected {
                domain: self.domain,
                source,
            })?;

        RiskLabel::from_class(class_id).ok_or(ClassifierError::UnknownClass {
            domain: self.domain,
            class_id,
        })
    }
}

/// The four domain classifiers, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ClassifierSet {
    academic: ClassifierAdapter,
    family: ClassifierAdapter,
    economic: ClassifierAdapter,
    psychosocial: ClassifierAdapter,
}

impl ClassifierSet {
    pub fn new<F>(mut build: F) -> Self
    where
        F: FnMut(Domain) -> Arc<dyn RiskClassifier>,
    {
        let mut adapter = |domain| ClassifierAdapter::new(domain, build(domain));
        Self {
            academic: adapter(Domain::Academic),
            family: adapter(Domain::Family),
            economic: adapter(Domain::Economic),
            psychosocial: adapter(Domain::Psychosocial),
        }
    }

    /// Stubs sized to each domain's schema, all answering `class_id`.
    pub fn fixed(class_id: u8) -> Self {
        Self::new(|domain| {
            let width = FeatureSchema::for_domain(domain).width();
            let model: Arc<dyn RiskClassifier> = Arc::new(FixedClassifier::new(class_id, width));
            model
        })
    }

    /// Load `<dir>/<domain>.json` for every domain.
    pub fn from_model_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let load = |domain: Domain| -> Result<Arc<dyn RiskClassifier>, ArtifactError> {
            let path = model_path(dir, domain);
            let model = TreeEnsembleModel::from_path(&path).map_err(|source| ArtifactError {
                domain,
                path: path.clone(),
                source,
            })?;
            info!(
                domain = %domain,
                path = %path.display(),
                trees = model.tree_count(),
                "loaded classifier artifact"
            );
            Ok(Arc::new(model))
        };

        Ok(Self {
            academic: ClassifierAdapter::new(Domain::Academic, load(Domain::Academic)?),
            family: ClassifierAdapter::new(Domain::Family, load(Domain::Family)?),
            economic: ClassifierAdapter::new(Domain::Economic, load(Domain::Economic)?),
            psychosocial: ClassifierAdapter::new(Domain::Psychosocial, load(Domain::Psychosocial)?),
        })
    }

    pub fn adapter(&self, domain: Domain) -> &ClassifierAdapter {
        match domain {
            Domain::Academic => &self.academic,
            Domain::Family => &self.family,
            Domain::Economic => &self.economic,
            Domain::Psychosocial => &self.psychosocial,
        }
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
        self.adapter(features.domain).classify(features)
    }
}

pub fn model_path(dir: &Path, domain: Domain) -> PathBuf {
    dir.join(format!("{}.json", domain.artifact_stem()))
}

/// Fatal classification failures; they signal drift between features and trained models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    #[error("{found} features passed to the {expected} classifier")]
    DomainMismatch { expected: Domain, found: Domain },
    #[error("{domain} classifier expects {expected} features, received {found}")]
    WidthMismatch {
        domain: Domain,
        expected: usize,
        found: usize,
    },
    #[error("{domain} classifier rejected its input: {source}")]
    Rejected {
        domain: Domain,
        source: PredictionError,
    },
    #[error("{domain} classifier returned unknown class id {class_id}")]
    UnknownClass { domain: Domain, class_id: u8 },
}

/// A domain model artifact that could not be loaded.
#[derive(Debug, thiserror::Error)]
#[error("failed to load the {domain} model from {}: {source}", .path.display())]
pub struct ArtifactError {
    pub domain: Domain,
    pub path: PathBuf,
    pub source: ModelError,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(domain: Domain, width: usize) -> FeatureVector {
        FeatureVector {
            domain,
            schema_version: "v1",
            values: vec![1.0; width],
        }
    }

    #[test]
    fn fixed_stubs_map_to_labels() {
        let classifiers = ClassifierSet::fixed(1);
        for domain in Domain::ALL {
            let width = FeatureSchema::for_domain(domain).width();
            assert_eq!(
                classifiers.classify(&vector(domain, width)),
                Ok(RiskLabel::Medium)
            );
        }
    }

    #[test]
    fn width_mismatch_is_fatal() {
        let classifiers = ClassifierSet::fixed(0);
        assert_eq!(
            classifiers.classify(&vector(Domain::Economic, 5)),
            Err(ClassifierError::WidthMismatch {
                domain: Domain::Economic,
                expected: 4,
                found: 5,
            })
        );
    }

    #[test]
    fn out_of_range_classes_are_fatal() {
        let classifiers = ClassifierSet::fixed(3);
        assert_eq!(
            classifiers.classify(&vector(Domain::Academic, 4)),
            Err(ClassifierError::UnknownClass {
                domain: Domain::Academic,
                class_id: 3,
            })
        );
    }

    #[test]
    fn adapters_refuse_other_domains() {
        let classifiers = ClassifierSet::fixed(0);
        let adapter = classifiers.adapter(Domain::Family);
        assert_eq!(
            adapter.classify(&vector(Domain::Economic, 7)),
            Err(ClassifierError::DomainMismatch {
                expected: Domain::Family,
                found: Domain::Economic,
            })
        );
    }

    #[test]
    fn missing_artifacts_name_the_domain() {
        let dir = std::env::temp_dir().join("risk-screening-missing-models");
        let error = ClassifierSet::from_model_dir(&dir).expect_err("no artifacts present");
        assert_eq!(error.domain, Domain::Academic);
        assert_eq!(error.path, dir.join("academic.json"));
    }
}
