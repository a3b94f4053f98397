//! Replies returned by Wiz lights.

use std::fmt;

use serde::Deserialize;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// The `result` object of a reply.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReplyResult {
    pub(crate) success: bool,
}

impl ReplyResult {
    pub fn success(&self) -> bool {
        self.success
    }
}

/// A decoded reply datagram.
///
/// The method is echoed back from the request and `env` names the firmware
/// class of the device. Replies can only be obtained through [`Reply::decode`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Reply {
    pub(crate) method: String,
    pub(crate) env: String,
    pub(crate) result: ReplyResult,
}

impl Reply {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Error::Decoding)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn result(&self) -> &ReplyResult {
        &self.result
    }

    pub fn success(&self) -> bool {
        self.result.success
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method={} success={}", self.method, self.result.success)
    }
}
