use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PATH: &str = "gallery.json";
pub const DEFAULT_MAX_IMAGES: usize = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("repository must look like owner/name: {0:?}")]
    InvalidRepo(String),

    #[error("token is empty")]
    MissingToken,

    #[error("path is empty")]
    MissingPath,
}

/// Coordinate and credential of the gallery document.
#[derive(Clone)]
pub struct StoreConfig {
    pub api_base: String,
    /// `owner/name`
    pub repo: String,
    pub path: String,
    pub token: String,
    pub timeout: Duration,
    /// overrides the default commit message of writes
    pub commit_message: Option<String>,
}

impl StoreConfig {
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            repo: repo.into(),
            path: DEFAULT_PATH.to_owned(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            commit_message: None,
        }
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.owner_and_name()?;

        if self.token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        if self.path.trim_matches('/').is_empty() {
            return Err(Error::MissingPath);
        }

        Ok(())
    }

    pub fn owner_and_name(&self) -> Result<(&str, &str), Error> {
        match self.repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => Err(Error::InvalidRepo(self.repo.clone())),
        }
    }

    /// `{api_base}/repos/{repo}/contents/{path}`
    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.repo,
            self.path.trim_start_matches('/')
        )
    }

    /// Public web page that renders the gallery.
    pub fn pages_url(&self) -> Option<String> {
        let (owner, name) = self.owner_and_name().ok()?;

        Some(format!(
            "https://{}.github.io/{}/#galeria",
            owner.to_lowercase(),
            name
        ))
    }
}

// token stays out of logs
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .field("commit_message", &self.commit_message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_url() {
        let config = StoreConfig::new("SamiGamin/ildc-website", "t")
            .api_base("http://127.0.0.1:8080/")
            .path("/data/gallery.json");

        assert_eq!(
            config.contents_url(),
            "http://127.0.0.1:8080/repos/SamiGamin/ildc-website/contents/data/gallery.json"
        );
    }

    #[test]
    fn pages_url_lowercases_owner() {
        let config = StoreConfig::new("SamiGamin/ildc-website", "t");

        assert_eq!(
            config.pages_url().as_deref(),
            Some("https://samigamin.github.io/ildc-website/#galeria")
        );
    }

    #[test]
    fn validate() {
        assert!(StoreConfig::new("owner/name", "t").validate().is_ok());

        for repo in ["owner", "/name", "owner/", "a/b/c", ""] {
            assert!(
                matches!(
                    StoreConfig::new(repo, "t").validate(),
                    Err(Error::InvalidRepo(_))
                ),
                "{repo}"
            );
        }

        assert!(matches!(
            StoreConfig::new("owner/name", " ").validate(),
            Err(Error::MissingToken)
        ));
        assert!(matches!(
            StoreConfig::new("owner/name", "t").path("/").validate(),
            Err(Error::MissingPath)
        ));
    }

    #[test]
    fn debug_hides_token() {
        let config = StoreConfig::new("owner/name", "ghp_secret");

        assert!(!format!("{config:?}").contains("ghp_secret"));
    }
}
