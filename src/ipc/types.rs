use std::path::PathBuf;

use serde::Deserialize;

use crate::session::GraderSession;
use crate::store::GradeBook;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    /// Directory report files are written to; process cwd until selected.
    pub workspace: Option<PathBuf>,
    pub book: GradeBook,
    pub session: Option<GraderSession>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            book: GradeBook::new(),
            session: None,
        }
    }

    pub fn report_dir(&self) -> PathBuf {
        self.workspace.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
