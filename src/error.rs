use crate::{config, network};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Http: {0}")]
    Http(#[from] network::http::Error),

    #[error("Config: {0}")]
    Config(#[from] config::Error),
}
