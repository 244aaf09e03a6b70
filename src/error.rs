use thiserror::Error;

pub type Result<T> = std::result::Result<T, FplError>;

#[derive(Error, Debug)]
pub enum FplError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("report {report} has no players to plot (is --min_pts too high?)")]
    EmptyResult { report: String },

    #[error("render error: {0}")]
    Render(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A fetched record did not match the shape the normalizer expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("player {player} is missing field `{field}`")]
    MissingField { player: String, field: &'static str },

    #[error("player {player} has invalid `{field}`: {reason}")]
    InvalidField {
        player: String,
        field: &'static str,
        reason: String,
    },

    #[error("player {player} has unknown position code {code}")]
    UnknownPosition { player: String, code: i64 },

    #[error("player {player} has unmapped team code {code}")]
    UnknownTeam { player: String, code: i64 },

    #[error("invalid response json: {0}")]
    Json(String),
}

impl From<rust_xlsxwriter::XlsxError> for FplError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        FplError::Render(err.to_string())
    }
}
