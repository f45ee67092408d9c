pub mod pdf;

use crate::error::{HistoryGap, KaygiError};
use crate::history::HistoryStore;
use crate::model::HistoryRecord;

pub const REPORT_TITLE: &str = "Anksiyete Tahmin Raporu";

/// File name offered for download.
pub const DEFAULT_FILE_NAME: &str = "tahmin_raporu.pdf";

/// Content of a report independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub title: String,
    /// One `"<column>: <value>"` line per record field, in column order.
    pub lines: Vec<String>,
}

impl ReportLayout {
    pub fn for_record(record: &HistoryRecord) -> Self {
        let lines = HistoryRecord::COLUMNS
            .iter()
            .zip(record.values())
            .map(|(column, value)| format!("{column}: {value}"))
            .collect();
        ReportLayout {
            title: REPORT_TITLE.to_string(),
            lines,
        }
    }
}

/// Trait for document rendering backends.
pub trait ReportRenderer: Send + Sync {
    /// Render the layout into a complete document.
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, KaygiError>;

    /// Name of this rendering backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// The record a report is made from.
///
/// Fails with [`KaygiError::NoHistory`] when there is nothing to report,
/// telling an absent store apart from an emptied one.
pub fn latest_record(store: &dyn HistoryStore) -> Result<HistoryRecord, KaygiError> {
    if let Some(record) = store.last()? {
        return Ok(record);
    }
    let gap = if store.exists()? {
        HistoryGap::Empty
    } else {
        HistoryGap::Missing
    };
    Err(KaygiError::NoHistory(gap))
}

pub fn render_record(
    record: &HistoryRecord,
    renderer: &dyn ReportRenderer,
) -> Result<Vec<u8>, KaygiError> {
    let bytes = renderer.render(&ReportLayout::for_record(record))?;
    log::info!(
        "rendered report for latest prediction '{}' with {} ({} bytes)",
        record.outcome,
        renderer.backend_name(),
        bytes.len()
    );
    Ok(bytes)
}

/// Render the most recent history record.
pub fn generate(
    store: &dyn HistoryStore,
    renderer: &dyn ReportRenderer,
) -> Result<Vec<u8>, KaygiError> {
    render_record(&latest_record(store)?, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CsvHistoryStore;
    use crate::model::{InputRecord, PredictionCategory};

    struct EchoRenderer;

    impl ReportRenderer for EchoRenderer {
        fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, KaygiError> {
            Ok(layout.lines.join("\n").into_bytes())
        }

        fn backend_name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_layout_lists_every_column_in_order() {
        let record = HistoryRecord::new(&InputRecord::default(), PredictionCategory::Low);
        let layout = ReportLayout::for_record(&record);
        assert_eq!(layout.title, "Anksiyete Tahmin Raporu");
        assert_eq!(
            layout.lines,
            vec![
                "Yaş: 25",
                "Cinsiyet: Kadın",
                "Stres: 5",
                "Uyku: 7.0",
                "Tahmin: 0",
                "Sonuç: Düşük",
            ]
        );
    }

    #[test]
    fn test_generate_distinguishes_missing_and_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("tahmin_gecmisi.csv"));

        assert!(matches!(
            generate(&store, &EchoRenderer),
            Err(KaygiError::NoHistory(HistoryGap::Missing))
        ));

        store.clear().unwrap();
        assert!(matches!(
            generate(&store, &EchoRenderer),
            Err(KaygiError::NoHistory(HistoryGap::Empty))
        ));

        store
            .append(&HistoryRecord::new(&InputRecord::default(), PredictionCategory::High))
            .unwrap();
        let bytes = generate(&store, &EchoRenderer).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("Sonuç: Yüksek"));
    }
}
