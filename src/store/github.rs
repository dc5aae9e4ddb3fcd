use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Response, StatusCode};

use super::{Error, GalleryStore};
use crate::{
    config::StoreConfig,
    model::{Gallery, GalleryImage, Revision, Snapshot},
    network,
};

mod sealed {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize)]
    pub struct Content {
        #[serde(default)]
        pub content: String,
        pub sha: String,
    }

    #[derive(Debug, Serialize)]
    pub struct Put<'a> {
        pub message: String,
        pub content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sha: Option<&'a str>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiError {
        pub message: Option<String>,
    }
}

/// Gallery document kept in a repository file through the Contents API.
pub struct GitHubStore {
    client: reqwest::Client,
    config: StoreConfig,
    url: String,
}

impl GitHubStore {
    pub fn new(config: StoreConfig) -> crate::Result<Self> {
        config.validate()?;

        let client = network::http::client(&config)?;
        let url = config.contents_url();

        tracing::debug!(?config, "gallery store");

        Ok(Self {
            client,
            config,
            url,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn commit_message(&self, len: usize) -> String {
        self.config
            .commit_message
            .clone()
            .unwrap_or_else(|| format!("📸 Gallery updated ({len} images)"))
    }
}

/// Serializes `images` the way the document is stored.
pub(crate) fn encode(images: &[GalleryImage]) -> Result<String, Error> {
    let json = serde_json::to_string_pretty(images)?;

    Ok(STANDARD.encode(json))
}

/// The host wraps base64 payloads at 60 columns.
pub(crate) fn decode(content: &str) -> Result<Gallery, Error> {
    let compact = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();

    let buf = STANDARD.decode(compact)?;
    let text = String::from_utf8(buf)?;

    Ok(serde_json::from_str(&text)?)
}

async fn api_error(resp: Response) -> Error {
    let status = resp.status();

    let message = resp
        .json::<sealed::ApiError>()
        .await
        .ok()
        .and_then(|x| x.message)
        .unwrap_or_else(|| status.to_string());

    Error::Api { status, message }
}

#[async_trait]
impl GalleryStore for GitHubStore {
    async fn try_fetch(&self) -> Result<Snapshot, Error> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }

        if !status.is_success() {
            return Err(api_error(resp).await);
        }

        let content: sealed::Content = resp.json().await?;

        let images = decode(&content.content)?;

        tracing::debug!(sha = %content.sha, "fetched {} images", images.len());

        Ok(Snapshot {
            images,
            revision: Some(Revision::from(content.sha)),
        })
    }

    async fn try_save(
        &self,
        images: &[GalleryImage],
        revision: Option<&Revision>,
    ) -> Result<(), Error> {
        let body = sealed::Put {
            message: self.commit_message(images.len()),
            content: encode(images)?,
            sha: revision.map(Revision::as_str),
        };

        tracing::debug!(sha = ?body.sha, "saving {} images", images.len());

        let resp = self.client.put(&self.url).json(&body).send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(api_error(resp).await)
        }
    }
}
