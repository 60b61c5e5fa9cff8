use std::collections::HashMap;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{Error, RemoteError};

/// Name of the slot inside the remote document that holds the table.
pub const DATA_FILE_NAME: &str = "workout_data.csv";

#[derive(Deserialize, Debug)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Deserialize, Debug)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize, Debug)]
struct GistUpdate<'a> {
    files: HashMap<&'static str, GistFileUpdate<'a>>,
}

#[derive(Serialize, Debug)]
struct GistFileUpdate<'a> {
    content: &'a str,
}

/// Reads and replaces the table slot of one gist.
pub struct GistClient {
    client: Client,
    url: String,
    auth: String,
}

impl GistClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("workout-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpClient)?;

        Ok(GistClient {
            client,
            url: format!("{}/gists/{}", config.api_url.trim_end_matches('/'), config.gist_id),
            auth: format!("token {}", config.token),
        })
    }

    /// Current table text, or `None` when the gist has no table slot.
    pub fn fetch(&self) -> Result<Option<String>, RemoteError> {
        debug!(url = %self.url, "fetching remote workout data");
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()?;

        if response.status() != StatusCode::OK {
            return Err(RemoteError::Status(response.status()));
        }

        let mut gist: GistResponse = response.json()?;
        Ok(gist
            .files
            .remove(DATA_FILE_NAME)
            .and_then(|file| file.content))
    }

    /// Replaces the table slot with `content`.
    pub fn push(&self, content: &str) -> Result<(), RemoteError> {
        let mut files = HashMap::new();
        files.insert(DATA_FILE_NAME, GistFileUpdate { content });

        debug!(url = %self.url, bytes = content.len(), "pushing remote workout data");
        let response = self
            .client
            .patch(&self.url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .json(&GistUpdate { files })
            .send()?;

        if response.status() != StatusCode::OK {
            return Err(RemoteError::Status(response.status()));
        }
        Ok(())
    }
}
