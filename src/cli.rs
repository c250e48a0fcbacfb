use crate::audit_config::{
    AuditConfig, DEFAULT_REPORT_PATH, DEFAULT_UNUSED_MAX_ITEMS, DEFAULT_UNUSED_MIN_NAME_LEN,
};
use crate::audit_errors::AuditError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Audit recipes for internal consistency", long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string for the meals table
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Read recipes from a JSON export instead of the database
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the CSV report
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Report unused ingredients only when at most this many are found
    #[arg(long, default_value_t = DEFAULT_UNUSED_MAX_ITEMS)]
    pub unused_max_items: usize,

    /// Ignore unused ingredient names this short or shorter
    #[arg(long, default_value_t = DEFAULT_UNUSED_MIN_NAME_LEN)]
    pub unused_min_name_len: usize,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Where recipes are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSource {
    File(PathBuf),
    Database(String),
}

impl Cli {
    /// A JSON input file wins over a database URL
    pub fn source(&self) -> Result<RecipeSource, AuditError> {
        if let Some(path) = &self.input {
            return Ok(RecipeSource::File(path.clone()));
        }
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(RecipeSource::Database(url.to_string())),
            _ => Err(AuditError::Config(
                "no recipe source: set DATABASE_URL or pass --input".to_string(),
            )),
        }
    }

    pub fn audit_config(&self) -> Result<AuditConfig, AuditError> {
        let config = AuditConfig {
            unused_max_items: self.unused_max_items,
            unused_min_name_len: self.unused_min_name_len,
            ..AuditConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
