use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no {vs} quote for {asset} in response")]
    MissingQuote { asset: String, vs: String },

    #[error("invalid price: {0}")]
    InvalidPrice(f64),

    #[error("price source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// True when the provider answered with an error status. Connect,
    /// timeout and decode failures are not counted.
    pub fn is_http(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_status())
    }
}
