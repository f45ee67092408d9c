pub mod gbdt;

use crate::encoding::FeatureVector;
use crate::error::KaygiError;
use crate::model::PredictionCategory;
use gbdt::GbdtModel;
use std::path::Path;

/// A loaded, read-only classification model.
pub trait Classifier: Send + Sync {
    /// Feature names in the exact column order the model was trained on.
    fn declared_feature_names(&self) -> &[String];

    /// Predict one class index per row. Rows must already be in
    /// `declared_feature_names()` order.
    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, KaygiError>;

    /// Name of this inference backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Load a tree-ensemble model artifact from disk.
pub fn load_model(path: &Path) -> Result<GbdtModel, KaygiError> {
    let content = std::fs::read_to_string(path).map_err(|e| KaygiError::ModelLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let model = GbdtModel::parse(&content, path)?;
    log::info!(
        "loaded model {} ({} trees, {} classes, {} features)",
        path.display(),
        model.num_trees(),
        model.num_class(),
        model.declared_feature_names().len()
    );
    Ok(model)
}

/// Predict the category for a single encoded row.
///
/// The row is first aligned to the model's declared feature order.
pub fn predict(
    model: &dyn Classifier,
    features: &FeatureVector,
) -> Result<PredictionCategory, KaygiError> {
    let aligned = features.reindex(model.declared_feature_names());
    let dropped: Vec<&str> = features
        .names()
        .filter(|n| aligned.get(n).is_none())
        .collect();
    if !dropped.is_empty() {
        log::debug!("dropping features unknown to the model: {}", dropped.join(", "));
    }

    let classes = model.predict_rows(&[aligned.values()])?;
    let class = classes
        .first()
        .copied()
        .ok_or_else(|| KaygiError::ModelUnavailable {
            reason: format!("{} returned no prediction", model.backend_name()),
        })?;
    log::debug!("{} predicted class {}", model.backend_name(), class);
    PredictionCategory::from_index(class)
}
