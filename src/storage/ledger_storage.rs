use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::{fs::operations::replace_file, ledger::entities::Ledger};

/// Interface for abstracting storage of the ledger.
pub trait LedgerStorage {
    /// Reads the stored ledger. Storage that was never written yields an empty ledger.
    fn load(&self) -> impl Future<Output = Result<Ledger>>;

    /// Replaces the stored ledger with `ledger`.
    fn save(&self, ledger: &Ledger) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> LedgerStorage for T
where
    T::Target: LedgerStorage,
{
    fn load(&self) -> impl Future<Output = Result<Ledger>> {
        self.deref().load()
    }

    fn save(&self, ledger: &Ledger) -> impl Future<Output = Result<()>> {
        self.deref().save(ledger)
    }
}

/// The main realization of [LedgerStorage], keeps the ledger in a single JSON file.
pub struct JsonLedgerStorage {
    path: PathBuf,
}

impl JsonLedgerStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStorage for JsonLedgerStorage {
    async fn load(&self) -> Result<Ledger> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No record file at {:?}, starting with an empty ledger", self.path);
                return Ok(Ledger::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };

        debug!("Parsing {} bytes from {:?}", contents.len(), self.path);
        let ledger = serde_json::from_slice::<Ledger>(&contents)
            .with_context(|| format!("Record file {:?} is corrupted", self.path))?;
        ledger
            .validate()
            .with_context(|| format!("Record file {:?} is corrupted", self.path))?;
        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut buffer = serde_json::to_vec_pretty(ledger)?;
        buffer.push(b'\n');
        replace_file(&self.path, &buffer)
            .await
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        debug!("Saved {} weeks into {:?}", ledger.weeks().len(), self.path);
        Ok(())
    }
}

/// Keeps the ledger in memory. Goes through the same JSON encoding as [JsonLedgerStorage], so
/// what is loaded back is exactly what a file would give.
#[derive(Default)]
pub struct MemoryLedgerStorage {
    contents: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryLedgerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: &Ledger) -> Result<Self> {
        let storage = Self::new();
        *storage.lock_contents()? = Some(serde_json::to_string(ledger)?);
        Ok(storage)
    }

    /// Amount of times [LedgerStorage::save] was called.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|v| *v).unwrap_or_default()
    }

    fn lock_contents(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.contents
            .lock()
            .map_err(|_| anyhow!("In-memory ledger storage was poisoned"))
    }
}

impl LedgerStorage for MemoryLedgerStorage {
    async fn load(&self) -> Result<Ledger> {
        match self.lock_contents()?.as_deref() {
            Some(json) => {
                let ledger = serde_json::from_str::<Ledger>(json)?;
                ledger.validate()?;
                Ok(ledger)
            }
            None => Ok(Ledger::new()),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        *self.lock_contents()? = Some(serde_json::to_string(ledger)?);
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, sync::Arc};

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::ledger::{
        entities::{Ledger, Task, WeekRecord},
        hours::{Hours, MAX_TASK_HOURS},
    };

    use super::{JsonLedgerStorage, LedgerStorage, MemoryLedgerStorage};

    fn test_ledger() -> Ledger {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        Ledger::from(vec![
            WeekRecord::new(monday)
                .with_task(Task {
                    description: "Design review".into(),
                    hours: Hours::from_str("1.5").unwrap(),
                    logged_at: monday.and_hms_opt(10, 0, 0).unwrap(),
                })
                .with_task(Task {
                    description: "Emails, \"misc\"".into(),
                    hours: Hours::from_str("0.33").unwrap(),
                    logged_at: monday.and_hms_opt(17, 45, 0).unwrap(),
                }),
            WeekRecord::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()),
        ])
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_ledger() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLedgerStorage::new(dir.path().join("records.json"));
        assert_eq!(storage.load().await?, Ledger::new());
        assert!(!storage.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_file_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLedgerStorage::new(dir.path().join("state").join("records.json"));
        let ledger = test_ledger();

        storage.save(&ledger).await?;
        assert_eq!(storage.load().await?, ledger);

        // A second instance over the same file sees the same data.
        let reopened = JsonLedgerStorage::new(storage.path().to_path_buf());
        assert_eq!(reopened.load().await?, ledger);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_uses_plain_formats() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLedgerStorage::new(dir.path().join("records.json"));
        storage.save(&test_ledger()).await?;

        let raw = std::fs::read_to_string(storage.path())?;
        assert!(raw.contains(r#""week_start": "2024-06-03""#));
        assert!(raw.contains(r#""logged_at": "2024-06-03 17:45""#));
        assert!(raw.contains(r#""hours": 0.33"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_round_trip_at_hours_bound() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLedgerStorage::new(dir.path().join("records.json"));
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut week = WeekRecord::new(monday);
        for hours in ["168", "167.99", "123.45", "0.01", "99.99"] {
            week = week.with_task(Task {
                description: format!("{hours} hours"),
                hours: Hours::from_str(hours).unwrap(),
                logged_at: monday.and_hms_opt(8, 0, 0).unwrap(),
            });
        }
        let ledger = Ledger::from(vec![week]);

        storage.save(&ledger).await?;
        let reloaded = storage.load().await?;
        assert_eq!(reloaded, ledger);
        assert_eq!(reloaded.weeks()[0].tasks[0].hours.value(), MAX_TASK_HOURS);

        // Saving what was loaded doesn't drift.
        storage.save(&reloaded).await?;
        assert_eq!(storage.load().await?, ledger);
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_bound_hours_in_file_fail() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"week_start": "2024-06-03", "tasks": [
                {"description": "x", "hours": 7.922816251426434e28, "logged_at": "2024-06-03 10:00"}
            ]}]"#,
        )?;
        let err = JsonLedgerStorage::new(path).load().await.unwrap_err();
        assert!(err.to_string().contains("corrupted"));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_file_fails() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("records.json");

        std::fs::write(&path, r#"[{"week_start": "03/06/2024", "tasks": []}]"#)?;
        let err = JsonLedgerStorage::new(path.clone()).load().await.unwrap_err();
        assert!(err.to_string().contains("corrupted"));

        std::fs::write(&path, r#"[{"week_start": "2024-06-04", "tasks": []}]"#)?;
        assert!(JsonLedgerStorage::new(path.clone()).load().await.is_err());

        std::fs::write(&path, "not json")?;
        assert!(JsonLedgerStorage::new(path).load().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_storage() -> Result<()> {
        let storage = Arc::new(MemoryLedgerStorage::new());
        assert_eq!(storage.load().await?, Ledger::new());

        // Used through a pointer, like the tracker does in tests.
        storage.save(&test_ledger()).await?;
        assert_eq!(storage.load().await?, test_ledger());
        assert_eq!(storage.save_count(), 1);

        let seeded = MemoryLedgerStorage::with_ledger(&test_ledger())?;
        assert_eq!(seeded.load().await?, test_ledger());
        assert_eq!(seeded.save_count(), 0);
        Ok(())
    }
}
