//! Record storage
//!
//! The full record set is always read and written as one table. Writes go
//! to the local file first and then, when configured, to the remote gist.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result, SyncWarning};
use crate::gist::{GistClient, DATA_FILE_NAME};
use crate::models::{WorkoutRecord, COLUMNS};

/// A value together with the non-fatal warnings raised while producing it.
#[derive(Debug)]
pub struct Synced<T> {
    pub value: T,
    pub warnings: Vec<SyncWarning>,
}

impl<T> Synced<T> {
    pub fn clean(value: T) -> Self {
        Synced {
            value,
            warnings: Vec::new(),
        }
    }
}

pub trait RecordStore {
    /// Every stored record, in storage order.
    fn load(&self) -> Result<Synced<Vec<WorkoutRecord>>>;

    /// Replaces the stored table with `records`.
    fn persist(&self, records: &[WorkoutRecord]) -> Result<Vec<SyncWarning>>;

    /// Adds one record and returns the new full set.
    ///
    /// The default reads and rewrites the whole table.
    fn append(&self, record: WorkoutRecord) -> Result<Synced<Vec<WorkoutRecord>>> {
        let Synced {
            value: mut records,
            mut warnings,
        } = self.load()?;
        records.push(record);
        warnings.extend(self.persist(&records)?);
        Ok(Synced {
            value: records,
            warnings,
        })
    }
}

/// Local backup file plus optional remote gist.
pub struct DualStore {
    data_file: PathBuf,
    remote: Option<GistClient>,
}

impl DualStore {
    pub fn new(config: &Config) -> Result<Self> {
        let remote = config.remote.as_ref().map(GistClient::new).transpose()?;
        Ok(DualStore {
            data_file: config.data_file.clone(),
            remote,
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    fn load_remote(
        &self,
        remote: &GistClient,
    ) -> std::result::Result<Vec<WorkoutRecord>, SyncWarning> {
        let text = remote
            .fetch()
            .map_err(SyncWarning::Fetch)?
            .ok_or(SyncWarning::MissingDocument(DATA_FILE_NAME))?;
        decode(&text).map_err(SyncWarning::Malformed)
    }

    fn load_local(&self) -> Result<Vec<WorkoutRecord>> {
        match fs::read_to_string(&self.data_file) {
            Ok(text) => Ok(decode(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.data_file.display(), "no local data file yet");
                Ok(Vec::new())
            }
            Err(source) => Err(Error::Io {
                path: self.data_file.clone(),
                source,
            }),
        }
    }

    fn write_local(&self, text: &str) -> Result<()> {
        fs::write(&self.data_file, text).map_err(|source| Error::Io {
            path: self.data_file.clone(),
            source,
        })
    }
}

impl RecordStore for DualStore {
    fn load(&self) -> Result<Synced<Vec<WorkoutRecord>>> {
        let mut warnings = Vec::new();

        if let Some(remote) = &self.remote {
            match self.load_remote(remote) {
                Ok(records) => {
                    debug!(rows = records.len(), "loaded remote workout data");
                    // The remote copy wins over whatever the backup holds.
                    if let Err(e) = encode(&records).and_then(|text| self.write_local(&text)) {
                        let warning = SyncWarning::Backup(e);
                        warn!("{warning}");
                        warnings.push(warning);
                    }
                    return Ok(Synced {
                        value: records,
                        warnings,
                    });
                }
                Err(warning) => {
                    warn!("{warning}; falling back to local file");
                    warnings.push(warning);
                }
            }
        }

        let records = self.load_local()?;
        debug!(rows = records.len(), path = %self.data_file.display(), "loaded local workout data");
        Ok(Synced {
            value: records,
            warnings,
        })
    }

    fn persist(&self, records: &[WorkoutRecord]) -> Result<Vec<SyncWarning>> {
        let text = encode(records)?;
        self.write_local(&text)?;
        info!(rows = records.len(), path = %self.data_file.display(), "saved workout data locally");

        let warning = match &self.remote {
            None => SyncWarning::NotConfigured,
            Some(remote) => match remote.push(&text) {
                Ok(()) => {
                    info!(rows = records.len(), "saved workout data to remote");
                    return Ok(Vec::new());
                }
                Err(e) => SyncWarning::Push(e),
            },
        };
        warn!("{warning}");
        Ok(vec![warning])
    }
}

/// Serializes records as the six-column table, header always present.
pub fn encode(records: &[WorkoutRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses a table produced by [`encode`] or exported by a spreadsheet.
pub fn decode(text: &str) -> std::result::Result<Vec<WorkoutRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    reader.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Program;
    use chrono::NaiveDate;

    fn record(day: u32, set_number: u32, weight: f64) -> WorkoutRecord {
        WorkoutRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Program::A,
            "Жим лежа",
            set_number,
            10,
            weight,
        )
    }

    #[test]
    fn empty_table_is_header_only() {
        let text = encode(&[]).unwrap();
        assert_eq!(text, "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n");
        assert!(decode(&text).unwrap().is_empty());
    }

    #[test]
    fn encode_writes_one_row_per_set() {
        let text = encode(&[record(8, 1, 22.5)]).unwrap();
        assert_eq!(
            text,
            "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n\
             2024-01-08,Тренировка A,Жим лежа,1,10,22.5\n"
        );
    }

    #[test]
    fn embedded_delimiters_are_quoted() {
        let mut r = record(8, 1, 20.0);
        r.exercise = "Жим, узкий хват".to_string();
        let text = encode(&[r.clone()]).unwrap();
        assert!(text.contains("\"Жим, узкий хват\""));
        assert_eq!(decode(&text).unwrap(), vec![r]);
    }

    #[test]
    fn decode_accepts_float_counts_and_letters() {
        let text = "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n\
                    2024-01-01,B,Выпады,2.0,12.0,40\n";
        let records = decode(text).unwrap();
        assert_eq!(
            records,
            vec![WorkoutRecord::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                Program::B,
                "Выпады",
                2,
                12,
                40.0
            )]
        );
    }

    #[test]
    fn exercise_whitespace_survives() {
        let mut r = record(8, 1, 20.0);
        r.exercise = " Жим лежа ".to_string();
        let text = encode(&[r.clone()]).unwrap();
        assert_eq!(decode(&text).unwrap(), vec![r]);
    }

    #[test]
    fn decode_trims_typed_columns_only() {
        let text = "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n\
                    2024-01-08 ,Тренировка A, Жим лежа , 1,10 , 20\n";
        let records = decode(text).unwrap();
        let mut expected = record(8, 1, 20.0);
        expected.exercise = " Жим лежа ".to_string();
        assert_eq!(records, vec![expected]);
    }

    #[test]
    fn decode_rejects_fractional_reps() {
        let text = "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n\
                    2024-01-01,A,Пресс,1,2.5,0\n";
        assert!(decode(text).is_err());
    }

    #[test]
    fn decode_of_empty_text_is_empty() {
        assert!(decode("").unwrap().is_empty());
    }
}
