use jamcache_core::{SqliteStore, store::database_path};
use std::{error::Error, path::PathBuf};

pub struct JamcacheApp {
    pub database_path: PathBuf,
}

impl JamcacheApp {
    /// Resolve the database from the flag, then `DATABASE_URL`, then the
    /// platform data directory.
    pub fn new(database: Option<String>) -> Result<Self, Box<dyn Error>> {
        let configured = database.or_else(|| std::env::var("DATABASE_URL").ok());

        let database_path = match configured {
            Some(url) => match database_path(&url) {
                Some(path) => PathBuf::from(path),
                None => return Err("an in-memory database has nothing to inspect".into()),
            },
            None => dirs::data_dir()
                .ok_or("Could not find a data directory")?
                .join("jamcache")
                .join("db.sqlite3"),
        };

        Ok(Self { database_path })
    }

    pub fn open_store(&self) -> Result<SqliteStore, Box<dyn Error>> {
        Ok(SqliteStore::open(&self.database_path)?)
    }
}
