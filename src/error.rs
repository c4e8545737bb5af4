use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, PartialEq)]
pub enum Error {
    Config(String),
    Extraction(String),
    ExtractionTimeout(Duration),
    Classification(String),
    Write(PathBuf, String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(..)            => "config error",
            Error::Extraction(..)        => "extraction error",
            Error::ExtractionTimeout(..) => "extraction timeout",
            Error::Classification(..)    => "classification error",
            Error::Write(..)             => "write error",
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let kind = self.kind();
        match self {
            Error::Config(msg)          => write!(f, "{}: {}", kind, msg),
            Error::Extraction(msg)      => write!(f, "{}: {}", kind, msg),
            Error::ExtractionTimeout(d) => write!(f, "{}: no result after {:?}", kind, d),
            Error::Classification(msg)  => write!(f, "{}: {}", kind, msg),
            Error::Write(path, msg)     => write!(f, "{}: {}: {}", kind, path.display(), msg),
        }
    }
}
