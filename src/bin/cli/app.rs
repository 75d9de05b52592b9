use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use recall_lib::config::RecallConfig;
use recall_lib::knowledge::storage::parse_item_id;
use recall_lib::knowledge::{KnowledgeItem, KnowledgeStore};

/// Shared application state for CLI commands
pub struct App {
    pub config: RecallConfig,
    pub db_path: PathBuf,
    pub store: KnowledgeStore,
}

impl App {
    /// Load config and open the database
    pub fn new(config_path: Option<&Path>, db_override: Option<PathBuf>) -> Result<Self> {
        let config = RecallConfig::load(config_path).context("Failed to load config")?;

        let db_path = match db_override {
            Some(path) => path,
            None => config.database_path().context("Failed to resolve database path")?,
        };

        let store = KnowledgeStore::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Ok(Self {
            config,
            db_path,
            store,
        })
    }

    /// Parse an item ID given on the command line
    pub fn parse_id(&self, raw: &str) -> Result<Uuid> {
        Ok(parse_item_id(raw)?)
    }

    pub fn init(&self) -> Result<()> {
        self.store.init().context("Failed to initialize storage")
    }

    pub fn add(&self, title: &str) -> Result<KnowledgeItem> {
        self.store.add(title).context("Failed to add knowledge item")
    }

    pub fn list_all(&self) -> Result<Vec<KnowledgeItem>> {
        self.store.list_all().context("Failed to list knowledge items")
    }

    pub fn list_due_today(&self) -> Result<Vec<KnowledgeItem>> {
        self.store.list_due_today().context("Failed to list items due today")
    }

    pub fn mark_reviewed(&self, id: Uuid) -> Result<KnowledgeItem> {
        self.store.mark_reviewed(id).context("Failed to mark item reviewed")
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).context("Failed to delete knowledge item")
    }
}
