use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn corrupt_stream(message: impl Into<String>) -> Error {
        ErrorKind::CorruptStream {
            message: message.into(),
        }
        .into()
    }

    pub fn missing_field(field: impl Into<String>) -> Error {
        ErrorKind::MissingField {
            field: field.into(),
        }
        .into()
    }

    pub fn avro(context: impl Into<String>, source: apache_avro::Error) -> Error {
        ErrorKind::Avro {
            context: context.into(),
            source,
        }
        .into()
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Error {
        ErrorKind::SchemaMismatch {
            message: message.into(),
        }
        .into()
    }

    pub fn bad_header(message: impl Into<String>) -> Error {
        ErrorKind::BadHeader {
            message: message.into(),
        }
        .into()
    }

    pub fn missing_schema(fingerprint: u64) -> Error {
        ErrorKind::MissingSchema { fingerprint }.into()
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        ErrorKind::Io {
            context: context.into(),
            source,
        }
        .into()
    }

    /// Returns `true` if the error was raised because the input ended before
    /// a complete value could be read.
    pub fn is_unexpected_eof(&self) -> bool {
        let source = match self.kind() {
            ErrorKind::Io { source, .. } => source,
            ErrorKind::Avro {
                source: apache_avro::Error::ReadVariableIntegerBytes(source),
                ..
            } => source,
            _ => return false,
        };
        source.kind() == std::io::ErrorKind::UnexpectedEof
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("corrupt stream: {message}")]
    CorruptStream { message: String },

    #[error("field '{field}' does not have a value and has no default")]
    MissingField { field: String },

    #[error("avro error for '{context}': {source}")]
    Avro {
        context: String,
        source: apache_avro::Error,
    },

    #[error("writer and reader schemas cannot be resolved: {message}")]
    SchemaMismatch { message: String },

    #[error("bad message header: {message}")]
    BadHeader { message: String },

    #[error("cannot resolve schema for fingerprint {fingerprint:#018x}")]
    MissingSchema { fingerprint: u64 },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
