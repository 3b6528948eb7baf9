use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PredictionError, RiskClassifier};

/// Serialized decision-tree ensemble exported from the training notebooks.
///
/// Nodes are stored flat per tree with the root at index 0. Children always sit after their
/// parent, which keeps traversal bounded. Every constructor validates the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Values `<= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training samples per class that reached the leaf.
    Leaf { votes: Vec<f64> },
}

impl TreeEnsembleModel {
    pub fn new(
        n_features: usize,
        n_classes: usize,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelError> {
        let model = Self {
            n_features,
            n_classes,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        Self::from_reader(raw.as_bytes())
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Invalid("model declares no features".to_string()));
        }
        if self.n_classes == 0 || self.n_classes > usize::from(u8::MAX) {
            return Err(ModelError::Invalid(format!(
                "unsupported class count {}",
                self.n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("model contains no trees".to_string()));
        }

        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {tree_index} has no nodes")));
            }
            for (node_index, node) in tree.nodes.iter().enumerate() {
                self.validate_node(tree, node_index, node)
                    .map_err(|reason| {
                        ModelError::Invalid(format!("tree {tree_index} node {node_index}: {reason}"))
                    })?;
            }
        }
        Ok(())
    }

    fn validate_node(
        &self,
        tree: &DecisionTree,
        index: usize,
        node: &TreeNode,
    ) -> Result<(), String> {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= self.n_features {
                    return Err(format!("feature {feature} out of range"));
                }
                if !threshold.is_finite() {
                    return Err("threshold is not finite".to_string());
                }
                for child in [*left, *right] {
                    if child <= index || child >= tree.nodes.len() {
                        return Err(format!("child {child} is not a later node"));
                    }
                }
                Ok(())
            }
            TreeNode::Leaf { votes } => {
                if votes.len() != self.n_classes {
                    return Err(format!(
                        "{} votes for {} classes",
                        votes.len(),
                        self.n_classes
                    ));
                }
                if votes.iter().any(|vote| !vote.is_finite() || *vote < 0.0) {
                    return Err("votes must be finite and non-negative".to_string());
                }
                if votes.iter().sum::<f64>() <= 0.0 {
                    return Err("leaf has no votes".to_string());
                }
                Ok(())
            }
        }
    }

    fn leaf_votes<'a>(&self, tree: &'a DecisionTree, features: &[f64]) -> &'a [f64] {
        let mut index = 0;
        loop {
            match &tree.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { votes } => return votes,
            }
        }
    }

    /// Averaged class distribution across the ensemble.
    pub fn probabilities(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if features.len() != self.n_features {
            return Err(PredictionError::Width {
                expected: self.n_features,
                found: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|value| !value.is_finite()) {
            return Err(PredictionError::NonFinite { index });
        }

        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let votes = self.leaf_votes(tree, features);
            let sum: f64 = votes.iter().sum();
            for (total, vote) in totals.iter_mut().zip(votes) {
                *total += vote / sum;
            }
        }

        let trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / trees).collect())
    }
}

impl RiskClassifier for TreeEnsembleModel {
    fn expected_width(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<u8, PredictionError> {
        let probabilities = self.probabilities(features)?;
        let mut best = 0;
        for (class_id, probability) in probabilities.iter().enumerate() {
            if *probability > probabilities[best] {
                best = class_id;
            }
        }
        // class count is bounded by u8 during validation
        Ok(best as u8)
    }
}

/// Failures while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUMPS: &str = r#"{
        "n_features": 2,
        "n_classes": 3,
        "trees": [
            {"nodes": [
                {"kind": "split", "feature": 0, "threshold": 2.5, "left": 1, "right": 2},
                {"kind": "leaf", "votes": [8.0, 2.0, 0.0]},
                {"kind": "split", "feature": 1, "threshold": 3.0, "left": 3, "right": 4},
                {"kind": "leaf", "votes": [0.0, 6.0, 4.0]},
                {"kind": "leaf", "votes": [0.0, 1.0, 9.0]}
            ]},
            {"nodes": [
                {"kind": "split", "feature": 1, "threshold": 4.5, "left": 1, "right": 2},
                {"kind": "leaf", "votes": [1.0, 1.0, 0.0]},
                {"kind": "leaf", "votes": [0.0, 0.0, 5.0]}
            ]}
        ]
    }"#;

    #[test]
    fn soft_votes_across_trees() {
        let model = TreeEnsembleModel::from_json(STUMPS).expect("model loads");
        assert_eq!(model.expected_width(), 2);

        assert_eq!(model.predict(&[1.0, 1.0]), Ok(0));
        assert_eq!(model.predict(&[5.0, 1.0]), Ok(1));
        assert_eq!(model.predict(&[5.0, 5.0]), Ok(2));
    }

    #[test]
    fn thresholds_are_inclusive_on_the_left() {
        let model = TreeEnsembleModel::from_json(STUMPS).expect("model loads");
        let probabilities = model.probabilities(&[2.5, 1.0]).expect("predicts");
        assert!((probabilities[0] - 0.65).abs() < 1e-9);
    }

    #[test]
    fn ties_resolve_to_the_lowest_class() {
        let raw = r#"{"n_features": 1, "n_classes": 3, "trees": [
            {"nodes": [{"kind": "leaf", "votes": [0.0, 3.0, 3.0]}]}
        ]}"#;
        let model = TreeEnsembleModel::from_json(raw).expect("model loads");
        assert_eq!(model.predict(&[4.0]), Ok(1));
    }

    #[test]
    fn rejects_wrong_widths_and_non_finite_input() {
        let model = TreeEnsembleModel::from_json(STUMPS).expect("model loads");
        assert_eq!(
            model.predict(&[1.0]),
            Err(PredictionError::Width {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            model.predict(&[1.0, f64::NAN]),
            Err(PredictionError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn backward_children_are_invalid() {
        let raw = r#"{"n_features": 1, "n_classes": 2, "trees": [
            {"nodes": [
                {"kind": "split", "feature": 0, "threshold": 1.0, "left": 0, "right": 1},
                {"kind": "leaf", "votes": [1.0, 0.0]}
            ]}
        ]}"#;
        assert!(matches!(
            TreeEnsembleModel::from_json(raw),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn constructed_models_are_validated() {
        let looping = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf {
                    votes: vec![1.0, 0.0],
                },
            ],
        };
        assert!(matches!(
            TreeEnsembleModel::new(1, 2, vec![looping]),
            Err(ModelError::Invalid(_))
        ));

        let dangling = DecisionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 1,
                right: 7,
            }],
        };
        assert!(matches!(
            TreeEnsembleModel::new(1, 2, vec![dangling]),
            Err(ModelError::Invalid(_))
        ));

        let stump = DecisionTree {
            nodes: vec![TreeNode::Leaf {
                votes: vec![0.0, 2.0],
            }],
        };
        let model = TreeEnsembleModel::new(1, 2, vec![stump]).expect("valid stump");
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.predict(&[0.5]), Ok(1));
    }

    #[test]
    fn leaf_vote_width_must_match_class_count() {
        let raw = r#"{"n_features": 1, "n_classes": 3, "trees": [
            {"nodes": [{"kind": "leaf", "votes": [1.0, 0.0]}]}
        ]}"#;
        assert!(matches!(
            TreeEnsembleModel::from_json(raw),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            TreeEnsembleModel::from_json("{\"n_features\": 1"),
            Err(ModelError::Json(_))
        ));
    }
}
