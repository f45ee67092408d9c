use crate::error::KaygiError;
use crate::inference::Classifier;
use serde::Deserialize;
use std::path::Path;

/// LightGBM treats values this close to zero as zero for `missing_type: Zero`.
const ZERO_THRESHOLD: f64 = 1e-35;

/// Top level of a LightGBM `Booster.dump_model()` document.
#[derive(Debug, Deserialize)]
struct DumpDef {
    num_class: usize,
    #[serde(default)]
    num_tree_per_iteration: Option<usize>,
    #[serde(default)]
    max_feature_idx: Option<usize>,
    #[serde(default)]
    objective: Option<String>,
    feature_names: Vec<String>,
    tree_info: Vec<TreeInfoDef>,
}

#[derive(Debug, Deserialize)]
struct TreeInfoDef {
    tree_structure: NodeDef,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeDef {
    Split(SplitDef),
    Leaf(LeafDef),
}

#[derive(Debug, Deserialize)]
struct SplitDef {
    split_feature: usize,
    threshold: ThresholdDef,
    decision_type: DecisionType,
    #[serde(default)]
    default_left: bool,
    #[serde(default)]
    missing_type: MissingType,
    left_child: Box<NodeDef>,
    right_child: Box<NodeDef>,
}

#[derive(Debug, Deserialize)]
struct LeafDef {
    leaf_value: f64,
}

/// Numerical splits carry a number, categorical ones a `"1||3||4"` set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThresholdDef {
    Value(f64),
    Categories(String),
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum DecisionType {
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
enum MissingType {
    #[default]
    None,
    Zero,
    NaN,
}

#[derive(Debug, Clone)]
enum SplitRule {
    LessOrEqual(f64),
    InSet(Vec<i64>),
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        rule: SplitRule,
        default_left: bool,
        missing: MissingType,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    rule,
                    default_left,
                    missing,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    node = if goes_left(rule, *default_left, *missing, value) {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }
}

fn goes_left(rule: &SplitRule, default_left: bool, missing: MissingType, value: f64) -> bool {
    match rule {
        SplitRule::LessOrEqual(threshold) => {
            let value = if value.is_nan() && missing != MissingType::NaN {
                0.0
            } else {
                value
            };
            let is_missing = match missing {
                MissingType::None => false,
                MissingType::Zero => value.abs() <= ZERO_THRESHOLD,
                MissingType::NaN => value.is_nan(),
            };
            if is_missing {
                default_left
            } else {
                value <= *threshold
            }
        }
        SplitRule::InSet(categories) => {
            if value.is_nan() || value < 0.0 {
                return false;
            }
            categories.contains(&(value as i64))
        }
    }
}

fn compile(def: NodeDef, num_features: usize) -> Result<Node, String> {
    match def {
        NodeDef::Leaf(leaf) => Ok(Node::Leaf(leaf.leaf_value)),
        NodeDef::Split(split) => {
            if split.split_feature >= num_features {
                return Err(format!(
                    "split refers to feature {} but only {} features are declared",
                    split.split_feature, num_features
                ));
            }
            let rule = match (split.decision_type, split.threshold) {
                (DecisionType::LessOrEqual, ThresholdDef::Value(t)) => SplitRule::LessOrEqual(t),
                (DecisionType::Equal, ThresholdDef::Categories(set)) => {
                    SplitRule::InSet(parse_category_set(&set)?)
                }
                (DecisionType::Equal, ThresholdDef::Value(t)) => {
                    SplitRule::InSet(vec![t as i64])
                }
                (DecisionType::LessOrEqual, ThresholdDef::Categories(raw)) => {
                    return Err(format!("numerical split with non-numeric threshold '{raw}'"));
                }
            };
            Ok(Node::Split {
                feature: split.split_feature,
                rule,
                default_left: split.default_left,
                missing: split.missing_type,
                left: Box::new(compile(*split.left_child, num_features)?),
                right: Box::new(compile(*split.right_child, num_features)?),
            })
        }
    }
}

fn parse_category_set(raw: &str) -> Result<Vec<i64>, String> {
    raw.split("||")
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid category '{part}' in threshold '{raw}': {e}"))
        })
        .collect()
}

/// Gradient-boosted tree ensemble read from a LightGBM JSON dump.
///
/// Tree `i` adds its leaf value to the raw score of class
/// `i % trees_per_iteration`; the predicted class is the arg-max of the raw
/// scores, lowest index winning ties.
#[derive(Debug, Clone)]
pub struct GbdtModel {
    feature_names: Vec<String>,
    num_class: usize,
    trees_per_iteration: usize,
    objective: Option<String>,
    trees: Vec<Node>,
}

impl GbdtModel {
    /// Parse a dump document. `source` only labels errors.
    pub fn parse(json: &str, source: &Path) -> Result<GbdtModel, KaygiError> {
        let corrupt = |reason: String| KaygiError::ModelLoad {
            path: source.to_path_buf(),
            reason,
        };

        let dump: DumpDef = serde_json::from_str(json).map_err(|e| corrupt(e.to_string()))?;

        if dump.num_class == 0 {
            return Err(corrupt("num_class must be at least 1".into()));
        }
        if dump.feature_names.is_empty() {
            return Err(corrupt("feature_names must not be empty".into()));
        }
        if let Some(max_idx) = dump.max_feature_idx {
            if max_idx + 1 != dump.feature_names.len() {
                return Err(corrupt(format!(
                    "max_feature_idx is {} but {} feature names are listed",
                    max_idx,
                    dump.feature_names.len()
                )));
            }
        }
        if dump.tree_info.is_empty() {
            return Err(corrupt("tree_info must not be empty".into()));
        }

        let trees_per_iteration = dump.num_tree_per_iteration.unwrap_or(dump.num_class).max(1);
        let num_features = dump.feature_names.len();
        let trees = dump
            .tree_info
            .into_iter()
            .map(|t| compile(t.tree_structure, num_features))
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        Ok(GbdtModel {
            feature_names: dump.feature_names,
            num_class: dump.num_class,
            trees_per_iteration,
            objective: dump.objective,
            trees,
        })
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn objective(&self) -> Option<&str> {
        self.objective.as_deref()
    }

    /// Summed leaf values per class for one row.
    pub fn raw_scores(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = vec![0.0; self.trees_per_iteration];
        for (i, tree) in self.trees.iter().enumerate() {
            scores[i % self.trees_per_iteration] += tree.evaluate(row);
        }
        scores
    }

    fn predict_class(&self, row: &[f64]) -> i64 {
        let scores = self.raw_scores(row);
        if scores.len() == 1 {
            // Single-output (binary) model: positive margin means class 1.
            return if scores[0] > 0.0 { 1 } else { 0 };
        }
        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        best as i64
    }
}

impl Classifier for GbdtModel {
    fn declared_feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, KaygiError> {
        rows.iter()
            .map(|row| {
                if row.len() != self.feature_names.len() {
                    return Err(KaygiError::FeatureMismatch {
                        expected: self.feature_names.len(),
                        actual: row.len(),
                    });
                }
                Ok(self.predict_class(row))
            })
            .collect()
    }

    fn backend_name(&self) -> &str {
        "lightgbm-json"
    }
}
