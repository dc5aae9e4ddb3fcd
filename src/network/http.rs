use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    StatusCode,
};

use crate::config::StoreConfig;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("gallery-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Status: {0}")]
    Status(StatusCode),

    #[error("invalid token header: {0}")]
    InvalidToken(#[from] header::InvalidHeaderValue),

    #[error("Client: {0}")]
    Client(#[from] reqwest::Error),
}

fn default_headers(token: &str) -> Result<HeaderMap, Error> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
    authorization.set_sensitive(true);

    Ok(HeaderMap::from_iter([
        (header::AUTHORIZATION, authorization),
        (header::ACCEPT, HeaderValue::from_static(ACCEPT)),
        // api.github.com rejects requests without one
        (header::USER_AGENT, HeaderValue::from_static(USER_AGENT)),
    ]))
}

/// Every request made through the returned client is bounded by `config.timeout`.
pub fn client(config: &StoreConfig) -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .default_headers(default_headers(&config.token)?)
        .timeout(config.timeout)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_bearer_token() {
        let headers = default_headers("abc").unwrap();

        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert!(headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(headers[header::ACCEPT], ACCEPT);
        assert!(headers.contains_key(header::USER_AGENT));
    }

    #[test]
    fn reject_token_with_newline() {
        assert!(matches!(
            default_headers("abc\ndef"),
            Err(Error::InvalidToken(_))
        ));
    }
}
