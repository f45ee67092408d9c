use crate::error::KaygiError;
use crate::export::{self, DeliveryResult, ExportDispatcher, MailTransport};
use crate::history::{CsvHistoryStore, HistoryStore};
use crate::inference::{self, Classifier};
use crate::model::{HistoryRecord, InputRecord};
use crate::report::pdf::GenpdfRenderer;
use crate::report::{self, ReportRenderer, DEFAULT_FILE_NAME};
use crate::settings::Settings;
use crate::Prediction;
use serde::Serialize;
use std::sync::Arc;

/// What the history page shows.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub columns: Vec<String>,
    pub records: Vec<HistoryRecord>,
    /// False until the history file has been written at least once.
    pub stored: bool,
    /// Set when the store could not be read and an empty view is shown instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Everything one run of the tool works with.
///
/// Collaborators that fail to load are remembered as unavailable; only the
/// operations that need them fail.
pub struct Session {
    model: Result<Arc<dyn Classifier>, String>,
    renderer: Result<Box<dyn ReportRenderer>, FontFailure>,
    store: Box<dyn HistoryStore>,
    report_file_name: String,
}

/// Why the report font could not be loaded; raised again on each report request.
#[derive(Debug, Clone)]
struct FontFailure {
    path: std::path::PathBuf,
    reason: String,
}

impl Session {
    /// Session with only a history store; prediction and reports unavailable.
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        Session {
            model: Err("no model loaded".into()),
            renderer: Err(FontFailure {
                path: std::path::PathBuf::new(),
                reason: "no report font loaded".into(),
            }),
            store,
            report_file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn Classifier>) -> Self {
        self.model = Ok(model);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ReportRenderer>) -> Self {
        self.renderer = Ok(renderer);
        self
    }

    /// Load the model, font and history store named by `settings`.
    pub fn open(settings: &Settings) -> Self {
        let store = CsvHistoryStore::new(settings.history_path.clone());
        let mut session = Session::new(Box::new(store));
        session.report_file_name = settings.report_file_name.clone();

        match inference::load_model(&settings.model_path) {
            Ok(model) => session.model = Ok(Arc::new(model)),
            Err(e) => {
                log::error!("Model yüklenemedi: {e}");
                session.model = Err(e.to_string());
            }
        }

        match GenpdfRenderer::from_font_file(&settings.font_path) {
            Ok(renderer) => session.renderer = Ok(Box::new(renderer)),
            Err(e) => {
                log::warn!("reports disabled: {e}");
                let reason = match e {
                    KaygiError::FontLoad { reason, .. } => reason,
                    other => other.to_string(),
                };
                session.renderer = Err(FontFailure {
                    path: settings.font_path.clone(),
                    reason,
                });
            }
        }

        session
    }

    /// The loaded model, or why prediction is disabled.
    pub fn model(&self) -> Result<&dyn Classifier, KaygiError> {
        match &self.model {
            Ok(model) => Ok(model.as_ref()),
            Err(reason) => Err(KaygiError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    pub fn can_predict(&self) -> bool {
        self.model.is_ok()
    }

    pub fn report_file_name(&self) -> &str {
        &self.report_file_name
    }

    /// Validate, predict, and record one submission.
    pub fn predict(&self, input: &InputRecord) -> Result<Prediction, KaygiError> {
        let model = self.model()?;
        crate::predict_and_record(model, self.store.as_ref(), input)
    }

    /// History for display. An unreadable store shows as empty with a warning.
    pub fn history(&self) -> HistoryView {
        let columns = self.store.columns().unwrap_or_else(|_| {
            HistoryRecord::COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect()
        });
        let stored = self.store.exists().unwrap_or(false);
        match self.store.read_all() {
            Ok(records) => HistoryView {
                columns,
                records,
                stored,
                warning: None,
            },
            Err(e) => {
                log::warn!("showing empty history: {e}");
                HistoryView {
                    columns,
                    records: Vec::new(),
                    stored,
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    pub fn clear_history(&self) -> Result<(), KaygiError> {
        self.store.clear()
    }

    /// PDF for the most recent prediction.
    ///
    /// An empty history is reported before a missing font.
    pub fn report(&self) -> Result<Vec<u8>, KaygiError> {
        let record = report::latest_record(self.store.as_ref())?;
        let renderer = match &self.renderer {
            Ok(renderer) => renderer.as_ref(),
            Err(slot) => {
                return Err(KaygiError::FontLoad {
                    path: slot.path.clone(),
                    reason: slot.reason.clone(),
                })
            }
        };
        report::render_record(&record, renderer)
    }

    /// Generate the latest report and hand it to `dispatcher`.
    ///
    /// The address is checked before any report is generated.
    pub fn send<T: MailTransport>(
        &self,
        dispatcher: &ExportDispatcher<T>,
        address: &str,
    ) -> Result<DeliveryResult, KaygiError> {
        export::validate_address(address)?;
        let report = self.report()?;
        dispatcher.send(address, &self.report_file_name, &report)
    }
}
