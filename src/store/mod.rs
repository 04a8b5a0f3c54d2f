use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use log::warn;
use serde::{Deserialize, Serialize};

// Each field is an independently serialized document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    #[serde(default)]
    pub layout_json: String,
    #[serde(default)]
    pub matrix_json: String,
    #[serde(default)]
    pub theme: String,
}

#[derive(Clone)]
pub struct StoreClient {
    base_url: String,
    token: Option<String>,
}

impl StoreClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/auth/workspace", self.base_url.trim_end_matches('/'))
    }

    fn http(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("building HTTP client")
    }

    fn bearer(&self) -> Result<&str> {
        match &self.token {
            Some(token) => Ok(token.as_str()),
            None => bail!("no session token configured"),
        }
    }

    pub fn fetch(&self) -> Result<WorkspaceRecord> {
        let token = self.bearer()?;
        let response = self
            .http()?
            .get(self.endpoint())
            .bearer_auth(token)
            .send()
            .context("requesting workspace record")?
            .error_for_status()
            .context("workspace fetch rejected")?;
        response.json().context("decoding workspace record")
    }

    pub fn persist(&self, record: &WorkspaceRecord) -> Result<()> {
        let token = self.bearer()?;
        self.http()?
            .post(self.endpoint())
            .bearer_auth(token)
            .json(record)
            .send()
            .context("sending workspace record")?
            .error_for_status()
            .context("workspace save rejected")?;
        Ok(())
    }

    /// Runs the fetch on a worker thread; the frame loop polls the
    /// receiver.
    pub fn spawn_fetch(&self) -> Receiver<Result<WorkspaceRecord, String>> {
        let client = self.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = client.fetch().map_err(|error| {
                warn!("workspace load failed: {error:#}");
                error.to_string()
            });
            let _ = tx.send(result);
        });
        rx
    }

    pub fn spawn_persist(&self, record: WorkspaceRecord) -> Receiver<Result<(), String>> {
        let client = self.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = client.persist(&record).map_err(|error| {
                warn!("workspace save failed: {error:#}");
                error.to_string()
            });
            let _ = tx.send(result);
        });
        rx
    }
}
