use std::fmt;
use std::io;

/// Fatal failures of a generation run. Anything that is not one of these
/// (skipped groups, empty names, duplicate identifiers) is handled inline.
#[derive(Debug)]
pub enum Error {
    /// The archive, the archive entry or the output file could not be used.
    Io { context: String, source: io::Error },
    /// The archive entry is not a UCD grouped XML document.
    Parse { context: String, message: String },
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Check if an error has ErrorKind::NotFound in its chain
    pub fn is_not_found(&self) -> bool {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = source {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::NotFound {
                    return true;
                }
            }
            source = err.source();
        }
        false
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { context, source } => write!(f, "{}: {}", context, source),
            Error::Parse { context, message } => write!(f, "{}: {}", context, message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Parse { .. } => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => Error::io("archive", source),
            other => Error::io(
                "archive",
                io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
            ),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::parse("xml", err)
    }
}
