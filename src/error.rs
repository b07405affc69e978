use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("site name is required")]
    MissingName,
    #[error("site url is required")]
    MissingUrl,
    #[error("duplicate site name: {0}")]
    DuplicateName(String),
    #[error("could not determine the home directory")]
    HomeDirUnavailable,
}
