use crate::error::KaygiError;
use crate::history::HistoryStore;
use crate::model::HistoryRecord;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// History kept in a comma-separated file with a header row.
///
/// Every append rewrites the whole file: the new contents go to a temporary
/// file next to the store, which is then renamed over it.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvHistoryStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the store for reading; `None` if it does not exist yet.
    fn open(&self) -> Result<Option<File>, KaygiError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KaygiError::store_io(&self.path, e)),
        }
    }

    fn write_all(&self, records: &[HistoryRecord]) -> Result<(), KaygiError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| KaygiError::store_io(&self.path, e))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file());
            writer
                .write_record(HistoryRecord::COLUMNS)
                .map_err(|e| csv_error(&self.path, e))?;
            for record in records {
                writer
                    .serialize(record)
                    .map_err(|e| csv_error(&self.path, e))?;
            }
            writer
                .flush()
                .map_err(|e| KaygiError::store_io(&self.path, e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| KaygiError::store_io(&self.path, e.error))?;
        Ok(())
    }
}

fn csv_error(path: &Path, err: csv::Error) -> KaygiError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => KaygiError::store_io(path, source),
        _ => KaygiError::StoreCorrupt {
            path: path.to_path_buf(),
            reason,
        },
    }
}

impl HistoryStore for CsvHistoryStore {
    fn read_all(&self) -> Result<Vec<HistoryRecord>, KaygiError> {
        let Some(file) = self.open()? else {
            return Ok(Vec::new());
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        reader
            .deserialize::<HistoryRecord>()
            .map(|row| row.map_err(|e| csv_error(&self.path, e)))
            .collect()
    }

    fn append(&self, record: &HistoryRecord) -> Result<(), KaygiError> {
        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;
        log::info!(
            "appended prediction '{}' to {} ({} record(s))",
            record.outcome,
            self.path.display(),
            records.len()
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), KaygiError> {
        self.write_all(&[])?;
        log::info!("cleared history at {}", self.path.display());
        Ok(())
    }

    fn exists(&self) -> Result<bool, KaygiError> {
        self.path
            .try_exists()
            .map_err(|e| KaygiError::store_io(&self.path, e))
    }

    fn columns(&self) -> Result<Vec<String>, KaygiError> {
        let fixed = || -> Vec<String> {
            HistoryRecord::COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect()
        };
        let Some(file) = self.open()? else {
            return Ok(fixed());
        };
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader.headers().map_err(|e| csv_error(&self.path, e))?;
        if headers.is_empty() {
            return Ok(fixed());
        }
        Ok(headers.iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, InputRecord, PredictionCategory};
    use rust_decimal_macros::dec;

    fn record(age: u32, category: PredictionCategory) -> HistoryRecord {
        let input = InputRecord {
            age,
            ..InputRecord::default()
        };
        HistoryRecord::new(&input, category)
    }

    fn store() -> (tempfile::TempDir, CsvHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("tahmin_gecmisi.csv"));
        (dir, store)
    }

    #[test]
    fn test_absent_store_reads_empty() {
        let (_dir, store) = store();
        assert!(!store.exists().unwrap());
        assert!(store.read_all().unwrap().is_empty());
        assert!(store.last().unwrap().is_none());
        assert_eq!(store.columns().unwrap(), HistoryRecord::COLUMNS.to_vec());
    }

    #[test]
    fn test_append_then_read() {
        let (_dir, store) = store();
        let first = record(25, PredictionCategory::Low);
        let second = record(40, PredictionCategory::High);

        store.append(&first).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![first.clone()]);

        store.append(&second).unwrap();
        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all.last(), Some(&second));
    }

    #[test]
    fn test_file_format() {
        let (_dir, store) = store();
        store.append(&record(25, PredictionCategory::Low)).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Yaş,Cinsiyet,Stres,Uyku,Tahmin,Sonuç\n25,Kadın,5,7.0,0,Düşük\n");
    }

    #[test]
    fn test_reads_file_written_elsewhere() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            "Yaş,Cinsiyet,Stres,Uyku,Tahmin,Sonuç\n31,Erkek,8,5.5,2,Yüksek\n",
        )
        .unwrap();
        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].gender, Gender::Male);
        assert_eq!(all[0].sleep_hours, dec!(5.5));
        assert_eq!(all[0].prediction, 2);
    }

    #[test]
    fn test_clear_keeps_header_and_is_idempotent() {
        let (_dir, store) = store();
        store.append(&record(25, PredictionCategory::Low)).unwrap();

        store.clear().unwrap();
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.columns().unwrap(), HistoryRecord::COLUMNS.to_vec());

        store.clear().unwrap();
        assert!(store.read_all().unwrap().is_empty());
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Yaş,Cinsiyet,Stres,Uyku,Tahmin,Sonuç\n");
    }

    #[test]
    fn test_clear_on_absent_store_creates_header() {
        let (_dir, store) = store();
        store.clear().unwrap();
        assert!(store.exists().unwrap());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_store_is_reported_and_not_overwritten() {
        let (_dir, store) = store();
        let garbage = "Yaş,Cinsiyet,Stres,Uyku,Tahmin,Sonuç\nabc,Kadın,x,y,z,Düşük\n";
        std::fs::write(store.path(), garbage).unwrap();

        assert!(matches!(
            store.read_all(),
            Err(KaygiError::StoreCorrupt { .. })
        ));
        assert!(store.append(&record(25, PredictionCategory::Low)).is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), garbage);
    }

    #[test]
    fn test_unwritable_location_is_store_io() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("missing").join("history.csv"));
        assert!(matches!(
            store.append(&record(25, PredictionCategory::Low)),
            Err(KaygiError::StoreIo { .. })
        ));
    }
}
