use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

use sightline_geo::GeoError;

/// Error kinds for Sightline query compilation
///
/// This enum represents all possible error types that can occur while
/// compiling a search filter. Each error kind describes a specific category
/// of failure, enabling precise error handling.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::errors::{SightlineError, ErrorKind, SightlineResult};
///
/// fn example() -> SightlineResult<()> {
///     Err(SightlineError::new("Unknown field path", ErrorKind::InvalidFieldName))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Request Errors - a filter that cannot be compiled as given
    /// Generic validation error in the search filter
    ValidationError,
    /// A projection or predicate names a field outside the schema
    InvalidFieldName,
    /// Unsupported or unparseable coordinate reference system
    CrsError,
    /// Invalid or untransformable geometry
    GeometryError,

    // Startup Errors - subsystem construction failed
    /// Subsystem configuration failed at startup
    ConfigurationError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::CrsError => write!(f, "Coordinate system error"),
            ErrorKind::GeometryError => write!(f, "Geometry error"),
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Sightline error type.
///
/// `SightlineError` encapsulates error information including the error
/// message, kind, and optional cause. It supports error chaining and
/// backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::errors::{SightlineError, ErrorKind};
///
/// // Create a simple error
/// let err = SightlineError::new("Unknown field path", ErrorKind::InvalidFieldName);
///
/// // Create an error with a cause
/// let cause = SightlineError::new("Ring has 2 points", ErrorKind::GeometryError);
/// let err = SightlineError::new_with_cause("Cannot compile area filter", ErrorKind::ValidationError, cause);
/// ```
///
/// # Type alias
///
/// The `SightlineResult<T>` type alias is equivalent to
/// `Result<T, SightlineError>` and is used throughout the codebase for
/// operations that can fail.
#[derive(Clone)]
pub struct SightlineError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<SightlineError>>,
    // Captured once at construction and only ever read.
    backtrace: Arc<Backtrace>,
}

impl SightlineError {
    /// Creates a new `SightlineError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    ///
    /// # Returns
    ///
    /// A new `SightlineError` instance.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        SightlineError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `SightlineError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_type` - The category of error
    /// * `cause` - The underlying error that caused this error
    ///
    /// # Returns
    ///
    /// A new `SightlineError` instance with the cause error attached.
    pub fn new_with_cause(message: &str, error_type: ErrorKind, cause: SightlineError) -> Self {
        SightlineError {
            message: message.to_string(),
            error_kind: error_type,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<SightlineError>> {
        self.cause.as_ref()
    }
}

impl Display for SightlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for SightlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for SightlineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Sightline operations.
///
/// `SightlineResult<T>` is shorthand for `Result<T, SightlineError>`.
/// All fallible compilation operations return this type.
pub type SightlineResult<T> = Result<T, SightlineError>;

// From trait implementations for automatic error conversion
impl From<GeoError> for SightlineError {
    fn from(err: GeoError) -> Self {
        let error_kind = match &err {
            GeoError::UnsupportedCrs(_) => ErrorKind::CrsError,
            GeoError::Projection(_) => ErrorKind::GeometryError,
            GeoError::InvalidGeometry(_) => ErrorKind::GeometryError,
            GeoError::WktParse(_) => ErrorKind::GeometryError,
            GeoError::GeoJson(_) => ErrorKind::GeometryError,
        };
        SightlineError::new(&err.to_string(), error_kind)
    }
}

impl From<String> for SightlineError {
    fn from(msg: String) -> Self {
        SightlineError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for SightlineError {
    fn from(msg: &str) -> Self {
        SightlineError::new(msg, ErrorKind::InternalError)
    }
}
