pub mod utils;
pub mod websocket_handler;

use rustc_serialize::json::ParserError;
use thiserror::Error;

pub type Id = String;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed json: {0}")]
    Parser(#[from] ParserError),

    #[error("missed property `{0}`")]
    MissedProperty(String),

    #[error("property `{0}` has incompatible type")]
    IncompatibleType(String),

    #[error("property `{0}` is out of range")]
    OutOfRange(String),

    #[error("unknown unit type `{0}`")]
    UnknownUnitType(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
