use thiserror::Error;

/// Coarse classification shared by every failure the pipeline reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    RangeError,
    ParseError,
    IntegrityError,
    Network,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Parsing positive number failed: {0:?}")]
    Parse(String),

    #[error("Number is negative: {0}")]
    Negative(f64),

    #[error("Number is out of bound(..{bound}): {value}")]
    OutOfBound { value: f64, bound: f64 },
}

impl NumberError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NumberError::Parse(_) => ErrorKind::ParseError,
            NumberError::Negative(_) | NumberError::OutOfBound { .. } => ErrorKind::RangeError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid \"{option}\" {value:?}: {message}")]
    InvalidArgument {
        option: &'static str,
        value: String,
        message: String,
    },

    #[error("Invalid \"{option}\" {value:?}: {source}")]
    Number {
        option: &'static str,
        value: String,
        #[source]
        source: NumberError,
    },
}

impl FilterError {
    pub fn invalid(option: &'static str, value: &str, message: impl Into<String>) -> Self {
        FilterError::InvalidArgument {
            option,
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            FilterError::Number { source, .. } => source.kind(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Tag entries without a matching version entry: {}", orphaned.join(", "))]
    Integrity { orphaned: Vec<String> },

    #[error("Version list item #{index} has no version label")]
    MissingVersion { index: usize },

    #[error("Version {version} has an unparsable download count: {raw:?}")]
    InvalidDownloads { version: String, raw: String },

    #[error("Invalid selector {0:?}")]
    Selector(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Integrity { .. } => ErrorKind::IntegrityError,
            ExtractError::InvalidDownloads { .. } => ErrorKind::ParseError,
            ExtractError::MissingVersion { .. } | ExtractError::Selector(_) => {
                ErrorKind::IntegrityError
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            FetchError::Registry(_) => ErrorKind::Network,
            FetchError::Extract(e) => e.kind(),
        }
    }
}
