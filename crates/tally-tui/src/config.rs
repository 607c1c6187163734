use std::path::PathBuf;

use clap::Parser;
use tally_core::Palette;

use crate::workflow::RefreshPolicy;

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Browse and create spending categories")]
pub struct TuiConfig {
    /// SQLite database file
    #[arg(long, env = "TALLY_DB")]
    pub db: Option<PathBuf>,

    /// Comma-separated color tokens offered by the color picker
    #[arg(long, env = "TALLY_COLORS", value_delimiter = ',')]
    pub colors: Option<Vec<String>>,

    /// Comma-separated icon tokens offered by the icon picker
    #[arg(long, env = "TALLY_ICONS", value_delimiter = ',')]
    pub icons: Option<Vec<String>>,

    /// Re-fetch the list whenever the creation form closes, even on cancel
    #[arg(long, env = "TALLY_REFRESH_ON_CANCEL")]
    pub refresh_on_cancel: bool,

    /// Run as a picker: choosing a category prints it as JSON and exits
    #[arg(long)]
    pub pick: bool,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, env = "TALLY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl TuiConfig {
    pub fn palette(&self) -> Palette {
        let clean = |tokens: &Option<Vec<String>>| {
            tokens.as_ref().map(|list| {
                list.iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
            })
        };
        Palette::with_overrides(clean(&self.colors), clean(&self.icons))
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        if self.refresh_on_cancel {
            RefreshPolicy::OnEveryClose
        } else {
            RefreshPolicy::OnSuccess
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(tally_db::default_db_path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| tally_db::data_dir().join("tally.log"))
    }
}
