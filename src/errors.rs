use std::net::SocketAddr;
use std::time::Duration;

/// All error types that can occur when talking to a Wiz light.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The UDP socket could not be opened or connected to the light.
    #[error("error dialing light at {addr}: {err}")]
    Connection { addr: SocketAddr, err: std::io::Error },

    /// Failed to serialize a command to JSON.
    #[error("unable to marshal message: {0}")]
    Encoding(serde_json::Error),

    /// A send or receive on the socket failed.
    #[error("unable to {action} udp connection: {err}")]
    Transport { action: String, err: std::io::Error },

    /// The deadline passed before the send or receive completed.
    #[error("{action} timed out after {after:?}")]
    Timeout { action: String, after: Duration },

    /// The reply datagram was not a valid reply.
    #[error("unable to unmarshal message: {0}")]
    Decoding(serde_json::Error),

    /// A light operation failed; `source` is the underlying transport error.
    #[error("unable to {action}: {source}")]
    Command {
        action: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new connection error
    pub fn connection(addr: SocketAddr, err: std::io::Error) -> Self {
        Error::Connection { addr, err }
    }

    /// Create a new transport error
    pub fn transport(action: &str, err: std::io::Error) -> Self {
        Error::Transport {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new timeout error
    pub fn timeout(action: &str, after: Duration) -> Self {
        Error::Timeout {
            action: action.to_string(),
            after,
        }
    }

    /// Wrap an error with the light operation that produced it
    pub fn command(action: &str, source: Error) -> Self {
        Error::Command {
            action: action.to_string(),
            source: Box::new(source),
        }
    }

    /// Returns the transport-level error, looking through operation wrappers.
    pub fn cause(&self) -> &Error {
        match self {
            Error::Command { source, .. } => source.cause(),
            other => other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause(), Error::Timeout { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
