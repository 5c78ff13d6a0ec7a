use escom_shared::prefs::{PreferenceBag, PreferenceError, PREFERENCES_NAMESPACE};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

const PREFS_TABLE: TableDefinition<&str, &str> = TableDefinition::new(PREFERENCES_NAMESPACE);

/// Preference bag persisted in a redb file. Survives process restarts.
pub struct PreferenceDb {
    db: Database,
}

impl PreferenceDb {
    pub fn open(path: &Path) -> Result<Self, redb::Error> {
        let db = Database::create(path)?;

        // Ensure table exists
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(PREFS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(PreferenceDb { db })
    }

    fn read(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PREFS_TABLE)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn write_all(&self, entries: &[(&str, &str)]) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PREFS_TABLE)?;
            for (key, value) in entries {
                table.insert(*key, *value)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl PreferenceBag for PreferenceDb {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        self.read(key).map_err(|e| PreferenceError::Backend(e.to_string()))
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<(), PreferenceError> {
        self.write_all(entries)
            .map_err(|e| PreferenceError::Backend(e.to_string()))
    }
}
