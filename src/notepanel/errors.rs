use std::fmt;
use std::error::Error as StdError;
use std::io::Error as IoError;
use std::string::FromUtf8Error;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors produced by the note store. Every kind is recoverable at the
/// session boundary.
pub type StoreError = Error;

#[derive(Debug)]
pub enum ErrorKind {
    /// No workspace root is configured.
    NoWorkspace,
    /// A read or write system call failed.
    IoFailure(IoError),
    /// The notes file exists but does not hold valid note data.
    ParseFailure,
    /// The configuration file could not be read or parsed.
    Config,
    Generic,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub desc: String,
    pub detail: Option<String>,
}

impl Error {
    pub fn no_workspace() -> Error {
        Error {
            kind: ErrorKind::NoWorkspace,
            desc: "No workspace folder found. Please open a folder first.".to_string(),
            detail: None,
        }
    }

    pub fn parse_failure(desc: String) -> Error {
        Error {
            kind: ErrorKind::ParseFailure,
            desc: desc,
            detail: None,
        }
    }

    pub fn is_no_workspace(&self) -> bool {
        matches!(self.kind, ErrorKind::NoWorkspace)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.detail {
            Some(ref detail) => write!(f, "{}: {}", &self.desc, detail),
            None => write!(f, "{}", &self.desc),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.kind {
            ErrorKind::IoFailure(ref e) => Some(e),
            _ => None,
        }
    }
}

#[macro_export]
macro_rules! specific_fail {
    ($short:expr) => {{
        use $crate::errors::{Error, ErrorKind};
        Err(::std::convert::From::from(
            Error {
                kind: ErrorKind::Generic,
                desc: $short,
                detail: None
            }
        ))
    }}
}

#[macro_export]
macro_rules! specific_fail_str {
    ($s:expr) => {
        $crate::specific_fail!($s.to_string())
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error {
            desc: err.to_string(),
            kind: ErrorKind::IoFailure(err),
            detail: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error {
            kind: ErrorKind::ParseFailure,
            desc: "invalid note data".to_string(),
            detail: Some(err.to_string()),
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error {
            kind: ErrorKind::ParseFailure,
            desc: "notes file is not valid UTF-8".to_string(),
            detail: Some(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
   fn from(err: serde_yaml::Error) -> Error {
       Error {
           kind: ErrorKind::Config,
           desc: "invalid configuration".to_string(),
           detail: Some(err.to_string()),
       }
   }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Error {
        Error {
            kind: ErrorKind::Generic,
            desc: format!("panel task failed: {}", err),
            detail: None,
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Error {
        Error {
            kind: ErrorKind::Generic,
            desc: "formatting error".to_string(),
            detail: None,
        }
    }
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error {
            kind: ErrorKind::Generic,
            desc: err,
            detail: None,
        }
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error {
            kind: ErrorKind::Generic,
            desc: err.to_string(),
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_workspace_display() {
        let err = Error::no_workspace();
        assert!(err.is_no_workspace());
        assert_eq!(err.to_string(), "No workspace folder found. Please open a folder first.");
    }

    #[test]
    fn test_io_error_conversion_keeps_source() {
        let io = IoError::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err.kind, ErrorKind::IoFailure(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_json_error_conversion_is_parse_failure() {
        let json_err = serde_json::from_str::<Vec<u64>>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err.kind, ErrorKind::ParseFailure));
        assert!(err.to_string().starts_with("invalid note data: "));
    }

    #[test]
    fn test_specific_fail_is_generic() {
        let result: Result<()> = specific_fail_str!("ok bye");
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Generic));
        assert_eq!(err.to_string(), "ok bye");
    }
}
