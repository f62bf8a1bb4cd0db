//! LanceDB connection wrapper for table lifecycle management.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_schema::Schema;

use ragdesk_types::record::Corpus;

/// A LanceDB database rooted at a directory.
///
/// Each corpus lives in its own table (`products`, `faqs`).
#[derive(Clone)]
pub struct LanceConnection {
    db: lancedb::Connection,
    base_path: PathBuf,
}

impl LanceConnection {
    /// Open or create a database at `base_path`, creating the directory.
    pub async fn open(base_path: PathBuf) -> Result<Self, lancedb::Error> {
        std::fs::create_dir_all(&base_path).map_err(|e| lancedb::Error::CreateDir {
            path: base_path.display().to_string(),
            source: e,
        })?;

        let uri = base_path
            .to_str()
            .ok_or_else(|| lancedb::Error::InvalidInput {
                message: format!("path contains invalid UTF-8: {}", base_path.display()),
            })?;

        let db = lancedb::connect(uri).execute().await?;
        Ok(Self { db, base_path })
    }

    /// Open the table, creating it empty with `schema` if missing.
    pub async fn ensure_table(
        &self,
        table_name: &str,
        schema: Arc<Schema>,
    ) -> Result<lancedb::Table, lancedb::Error> {
        match self.db.open_table(table_name).execute().await {
            Ok(table) => Ok(table),
            Err(lancedb::Error::TableNotFound { .. }) => {
                self.db
                    .create_empty_table(table_name, schema)
                    .execute()
                    .await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn table_exists(&self, table_name: &str) -> bool {
        self.db.open_table(table_name).execute().await.is_ok()
    }

    /// Drop a table. Missing tables are not an error.
    pub async fn drop_table(&self, table_name: &str) -> Result<(), lancedb::Error> {
        match self.db.drop_table(table_name, &[]).await {
            Ok(()) | Err(lancedb::Error::TableNotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn table_names(&self) -> Result<Vec<String>, lancedb::Error> {
        self.db.table_names().execute().await
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Table holding `corpus`.
    pub fn table_name(corpus: Corpus) -> &'static str {
        match corpus {
            Corpus::Products => "products",
            Corpus::Faqs => "faqs",
        }
    }
}
