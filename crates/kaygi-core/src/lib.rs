pub mod encoding;
pub mod error;
pub mod export;
pub mod guidance;
pub mod history;
pub mod inference;
pub mod model;
pub mod report;
pub mod session;
pub mod settings;

use error::KaygiError;
use guidance::Guidance;
use history::HistoryStore;
use inference::Classifier;
use model::{HistoryRecord, InputRecord, PredictionCategory};
use serde::Serialize;

/// Outcome of one form submission.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub category: PredictionCategory,
    pub guidance: Guidance,
    /// The row that was appended to the history.
    pub record: HistoryRecord,
}

/// Main API entry point: encode a submission, classify it, and record it.
///
/// Invalid input is rejected before the model is consulted, and nothing is
/// written to the history unless the prediction succeeds.
pub fn predict_and_record(
    model: &dyn Classifier,
    store: &dyn HistoryStore,
    input: &InputRecord,
) -> Result<Prediction, KaygiError> {
    let features = encoding::encode(input)?;
    let category = inference::predict(model, &features)?;
    let guidance = guidance::resolve(category);

    let record = HistoryRecord::new(input, category);
    store.append(&record)?;

    Ok(Prediction {
        category,
        guidance,
        record,
    })
}
