use failure::Fail;

#[derive(Debug, Fail)]
pub enum ConsoleError {
    #[fail(display = "Request to {} failed: {}", _0, _1)]
    Transport(String, #[cause] reqwest::Error),
    #[fail(display = "Response from {} is not valid JSON: {}", _0, _1)]
    Decode(String, #[cause] serde_json::Error),
    #[fail(display = "Invalid URL {}: {}", _0, _1)]
    InvalidUrl(String, #[cause] url::ParseError),
    #[fail(display = "Request to {} was cancelled", _0)]
    Cancelled(String),
    #[fail(display = "Invalid configuration: {}", _0)]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
