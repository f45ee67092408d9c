//! Integration tests for the prediction → history → report → send pipeline.
//!
//! Uses the bundled demo model and a MockRenderer that records layouts
//! instead of drawing PDFs, so these tests need no font files.

use kaygi_core::error::{HistoryGap, KaygiError};
use kaygi_core::export::ExportDispatcher;
use kaygi_core::history::{CsvHistoryStore, HistoryStore};
use kaygi_core::inference::{load_model, Classifier};
use kaygi_core::model::{Gender, HistoryRecord, InputRecord, Occupation, PredictionCategory};
use kaygi_core::report::{ReportLayout, ReportRenderer};
use kaygi_core::session::Session;
use kaygi_core::settings::Settings;
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
struct MockRenderer {
    layouts: Arc<Mutex<Vec<ReportLayout>>>,
}

impl ReportRenderer for MockRenderer {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, KaygiError> {
        self.layouts.lock().unwrap().push(layout.clone());
        Ok(b"%PDF-mock".to_vec())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn bundled_model_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models/anxiety_model.json")
}

fn bundled_model() -> Arc<dyn Classifier> {
    Arc::new(load_model(&bundled_model_path()).unwrap())
}

fn scenario_input() -> InputRecord {
    InputRecord {
        age: 25,
        occupation: Occupation::Student,
        gender: Gender::Female,
        stress_level: 5,
        sleep_hours: dec!(7.0),
        ..InputRecord::default()
    }
}

fn session_in(dir: &Path) -> (Session, MockRenderer) {
    let renderer = MockRenderer::default();
    let store = CsvHistoryStore::new(dir.join("tahmin_gecmisi.csv"));
    let session = Session::new(Box::new(store))
        .with_model(bundled_model())
        .with_renderer(Box::new(renderer.clone()));
    (session, renderer)
}

// ---------------------------------------------------------------------------
// Bundled model
// ---------------------------------------------------------------------------
#[test]
fn bundled_model_declares_encoder_columns() {
    let model = bundled_model();
    assert_eq!(
        model.declared_feature_names().to_vec(),
        kaygi_core::encoding::ENCODED_COLUMNS.to_vec()
    );
}

#[test]
fn bundled_model_separates_stress_levels() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());

    let low = session.predict(&scenario_input()).unwrap();
    assert_eq!(low.category, PredictionCategory::Low);

    let medium = session
        .predict(&InputRecord {
            stress_level: 7,
            ..scenario_input()
        })
        .unwrap();
    assert_eq!(medium.category, PredictionCategory::Medium);

    let high = session
        .predict(&InputRecord {
            stress_level: 9,
            heart_rate_bpm: 100,
            ..scenario_input()
        })
        .unwrap();
    assert_eq!(high.category, PredictionCategory::High);
    assert_eq!(high.guidance.headline, "Yüksek Anksiyete");

    assert_eq!(session.history().records.len(), 3);
}

// ---------------------------------------------------------------------------
// Prediction and history
// ---------------------------------------------------------------------------
#[test]
fn low_prediction_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());

    let prediction = session.predict(&scenario_input()).unwrap();
    assert_eq!(prediction.category, PredictionCategory::Low);
    assert!(!prediction.guidance.recommendations().is_empty());

    let store = CsvHistoryStore::new(dir.path().join("tahmin_gecmisi.csv"));
    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prediction, 0);
    assert_eq!(records[0].outcome, "Düşük");
    assert_eq!(records[0], prediction.record);
}

#[test]
fn json_input_keeps_sleep_hours_scale_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());

    let json = serde_json::to_string(&scenario_input())
        .unwrap()
        .replace(r#""sleep_hours":"7.0""#, r#""sleep_hours":7.0"#);
    let input: InputRecord = serde_json::from_str(&json).unwrap();
    session.predict(&input).unwrap();

    let text = std::fs::read_to_string(dir.path().join("tahmin_gecmisi.csv")).unwrap();
    assert_eq!(
        text,
        "Yaş,Cinsiyet,Stres,Uyku,Tahmin,Sonuç\n25,Kadın,5,7.0,0,Düşük\n"
    );
}

#[test]
fn invalid_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());

    let err = session
        .predict(&InputRecord {
            caffeine_mg: 1500,
            ..scenario_input()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        KaygiError::InputValidation {
            field: "caffeine_mg",
            ..
        }
    ));
    assert!(!dir.path().join("tahmin_gecmisi.csv").exists());
}

#[test]
fn append_grows_history_by_one() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());
    session.predict(&scenario_input()).unwrap();
    let before = session.history().records.len();

    let prediction = session
        .predict(&InputRecord {
            gender: Gender::Other,
            ..scenario_input()
        })
        .unwrap();

    let after = session.history().records;
    assert_eq!(after.len(), before + 1);
    assert_eq!(after.last(), Some(&prediction.record));
}

#[test]
fn clear_empties_history_and_keeps_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());
    session.predict(&scenario_input()).unwrap();

    session.clear_history().unwrap();
    session.clear_history().unwrap();

    let view = session.history();
    assert!(view.records.is_empty());
    assert!(view.stored);
    assert_eq!(view.columns, HistoryRecord::COLUMNS.to_vec());
    assert!(view.warning.is_none());
}

#[test]
fn absent_history_is_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());

    let view = session.history();
    assert!(!view.stored);
    assert!(view.records.is_empty());
    assert_eq!(view.columns, HistoryRecord::COLUMNS.to_vec());
}

#[test]
fn corrupt_history_displays_empty_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tahmin_gecmisi.csv"), "Yaş,Cinsiyet\n1,2,3\n").unwrap();
    let (session, _) = session_in(dir.path());

    let view = session.history();
    assert!(view.records.is_empty());
    assert!(view.warning.is_some());
}

// ---------------------------------------------------------------------------
// Reports and sending
// ---------------------------------------------------------------------------
#[test]
fn report_without_history_is_informational() {
    let dir = tempfile::tempdir().unwrap();
    let (session, renderer) = session_in(dir.path());

    let err = session.report().unwrap_err();
    assert!(matches!(err, KaygiError::NoHistory(HistoryGap::Missing)));
    assert!(err.is_informational());
    assert!(renderer.layouts.lock().unwrap().is_empty());
}

#[test]
fn report_uses_most_recent_record() {
    let dir = tempfile::tempdir().unwrap();
    let (session, renderer) = session_in(dir.path());
    session.predict(&scenario_input()).unwrap();
    session
        .predict(&InputRecord {
            age: 42,
            gender: Gender::Male,
            stress_level: 7,
            ..scenario_input()
        })
        .unwrap();

    let bytes = session.report().unwrap();
    assert_eq!(bytes, b"%PDF-mock");

    let layouts = renderer.layouts.lock().unwrap();
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].title, "Anksiyete Tahmin Raporu");
    assert_eq!(layouts[0].lines[0], "Yaş: 42");
    assert_eq!(layouts[0].lines[1], "Cinsiyet: Erkek");
    assert_eq!(layouts[0].lines[5], "Sonuç: Orta");
}

#[test]
fn send_validates_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let (session, renderer) = session_in(dir.path());
    session.predict(&scenario_input()).unwrap();
    let dispatcher = ExportDispatcher::default();

    let err = session.send(&dispatcher, "not-an-email").unwrap_err();
    assert!(matches!(err, KaygiError::InvalidAddress(_)));
    assert!(renderer.layouts.lock().unwrap().is_empty());

    let result = session.send(&dispatcher, "a@b.com").unwrap();
    assert!(result.simulated);
    assert_eq!(result.recipient, "a@b.com");
    assert_eq!(result.file_name, "tahmin_raporu.pdf");
    assert_eq!(result.size_bytes, b"%PDF-mock".len());
}

#[test]
fn send_with_empty_history_reports_no_history() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_in(dir.path());
    let err = session
        .send(&ExportDispatcher::default(), "a@b.com")
        .unwrap_err();
    assert!(matches!(err, KaygiError::NoHistory(_)));
}

#[test]
fn report_after_clear_says_history_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (session, renderer) = session_in(dir.path());
    session.predict(&scenario_input()).unwrap();
    session.clear_history().unwrap();

    let err = session.report().unwrap_err();
    assert!(matches!(err, KaygiError::NoHistory(HistoryGap::Empty)));
    assert_eq!(
        err.to_string(),
        "PDF oluşturmak için geçmişte tahmin yapılmış olmalı."
    );
    assert!(renderer.layouts.lock().unwrap().is_empty());
}

#[test]
fn empty_history_is_reported_before_missing_font() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        model_path: dir.path().join("missing_model.json"),
        history_path: dir.path().join("tahmin_gecmisi.csv"),
        font_path: dir.path().join("missing.ttf"),
        ..Settings::default()
    };
    let session = Session::open(&settings);

    let err = session.report().unwrap_err();
    assert!(matches!(err, KaygiError::NoHistory(HistoryGap::Missing)));
    assert!(err.is_informational());

    session.clear_history().unwrap();
    let err = session
        .send(&ExportDispatcher::default(), "a@b.com")
        .unwrap_err();
    assert!(matches!(err, KaygiError::NoHistory(HistoryGap::Empty)));
}

// ---------------------------------------------------------------------------
// Degraded startup
// ---------------------------------------------------------------------------
#[test]
fn missing_model_disables_prediction_only() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        model_path: dir.path().join("missing_model.json"),
        history_path: dir.path().join("tahmin_gecmisi.csv"),
        font_path: dir.path().join("missing.ttf"),
        ..Settings::default()
    };

    assert!(matches!(
        load_model(&settings.model_path),
        Err(KaygiError::ModelLoad { .. })
    ));

    let session = Session::open(&settings);
    assert!(!session.can_predict());
    assert!(matches!(
        session.predict(&scenario_input()),
        Err(KaygiError::ModelUnavailable { .. })
    ));

    // History written by an earlier run still renders.
    CsvHistoryStore::new(settings.history_path.clone())
        .append(&HistoryRecord::new(&scenario_input(), PredictionCategory::Low))
        .unwrap();
    let view = session.history();
    assert_eq!(view.records.len(), 1);
    assert!(view.warning.is_none());

    // The font is missing too, which only affects reports.
    assert!(matches!(
        session.report(),
        Err(KaygiError::FontLoad { .. })
    ));
}

#[test]
fn open_with_bundled_model_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        model_path: bundled_model_path(),
        history_path: dir.path().join("history.csv"),
        font_path: dir.path().join("missing.ttf"),
        ..Settings::default()
    };
    let session = Session::open(&settings);
    assert!(session.can_predict());
    let prediction = session.predict(&scenario_input()).unwrap();
    assert_eq!(prediction.record.outcome, "Düşük");
    assert!(settings.history_path.exists());
}
