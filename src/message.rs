//! Commands sent to Wiz lights.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::errors::Error;
use crate::types::Colors;

type Result<T> = std::result::Result<T, Error>;

/// Methods understood by the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Method {
    #[serde(rename = "setPilot")]
    #[strum(serialize = "setPilot")]
    SetPilot,
}

/// Parameters of a `setPilot` command.
///
/// Channel values of zero are stored as `None` and never reach the wire.
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Params {
    pub(crate) state: bool,
    #[serde(rename = "w")]
    pub(crate) white: Option<u8>,
    #[serde(rename = "r")]
    pub(crate) red: Option<u8>,
    #[serde(rename = "b")]
    pub(crate) blue: Option<u8>,
    #[serde(rename = "g")]
    pub(crate) green: Option<u8>,
    pub(crate) dimming: Option<u8>,
}

impl Params {
    pub fn state(&self) -> bool {
        self.state
    }

    pub fn white(&self) -> Option<u8> {
        self.white
    }

    pub fn red(&self) -> Option<u8> {
        self.red
    }

    pub fn blue(&self) -> Option<u8> {
        self.blue
    }

    pub fn green(&self) -> Option<u8> {
        self.green
    }

    pub fn dimming(&self) -> Option<u8> {
        self.dimming
    }
}

fn channel(value: u8) -> Option<u8> {
    (value != 0).then_some(value)
}

/// A single command for the light.
///
/// # Example
///
/// ```
/// use wiz_pulse::{Colors, Message};
///
/// let msg = Message::color(&Colors::rgb(255, 100, 0), 50);
/// assert_eq!(
///     String::from_utf8(msg.encode().unwrap()).unwrap(),
///     r#"{"method":"setPilot","params":{"state":true,"r":255,"g":100,"dimming":50}}"#
/// );
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub(crate) method: Method,
    pub(crate) params: Params,
}

impl Message {
    /// Switch the light on or off without touching color or brightness.
    pub fn power(on: bool) -> Self {
        Message {
            method: Method::SetPilot,
            params: Params {
                state: on,
                ..Params::default()
            },
        }
    }

    /// Switch the light on with the given channels and dimming level.
    pub fn color(colors: &Colors, dimming: u8) -> Self {
        Message {
            method: Method::SetPilot,
            params: Params {
                state: true,
                white: channel(colors.white),
                red: channel(colors.red),
                blue: channel(colors.blue),
                green: channel(colors.green),
                dimming: channel(dimming),
            },
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Serialize into the JSON datagram payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::Encoding)
    }
}
