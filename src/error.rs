use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidInput,
    MalformedDate,
    EmptyGrid,
    PayloadParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::MalformedDate,
            format!("Could not parse date: {}", parse_error).as_str(),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::PayloadParse,
            format!("Could not parse payload: {}", json_error).as_str(),
        )
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err.kind {
            ErrorKind::IOError(io_err) => io_err,
            kind => io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| kind.as_str()),
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidInput => "invalid input".to_owned(),
            ErrorKind::MalformedDate => "invalid date format".to_owned(),
            ErrorKind::EmptyGrid => "grid has no weeks".to_owned(),
            ErrorKind::PayloadParse => "invalid contribution payload".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}
