pub mod csv_store;

use crate::error::KaygiError;
use crate::model::HistoryRecord;

pub use csv_store::CsvHistoryStore;

/// Durable, append-only log of past predictions.
///
/// Implementations assume a single writer; nothing here locks.
pub trait HistoryStore {
    /// All records in insertion order. An absent store is empty, not an error.
    fn read_all(&self) -> Result<Vec<HistoryRecord>, KaygiError>;

    /// Add one record after every existing one.
    fn append(&self, record: &HistoryRecord) -> Result<(), KaygiError>;

    /// Remove every record but keep the column schema.
    fn clear(&self) -> Result<(), KaygiError>;

    /// Whether the store has been created, even if it holds no records.
    fn exists(&self) -> Result<bool, KaygiError>;

    /// Column names for display, in stored order.
    fn columns(&self) -> Result<Vec<String>, KaygiError> {
        Ok(HistoryRecord::COLUMNS.iter().map(|c| c.to_string()).collect())
    }

    /// The most recent record, if any.
    fn last(&self) -> Result<Option<HistoryRecord>, KaygiError> {
        Ok(self.read_all()?.pop())
    }
}
