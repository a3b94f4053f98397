//! # wiz_pulse
//!
//! An async client for a single Wiz smart light over its JSON-over-UDP protocol.
//!
//! A [`Light`] owns one UDP socket connected to the bulb. Every call is one
//! request datagram and one reply datagram with a deadline and no retries.
//! On top of that it can run a pulse effect that blinks the bulb between a
//! dim and a full level until cancelled.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wiz_pulse::{Colors, Light, LightConfig};
//!
//! async fn blink() -> Result<(), wiz_pulse::Error> {
//!     let config = LightConfig::default().with_timeout(Duration::from_millis(500));
//!     let light = Arc::new(Light::connect("192.168.1.100:38899".parse().unwrap(), config).await?);
//!
//!     let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(255, 100, 0));
//!     // ... wait for a shutdown signal
//!     pulse.stop().await;
//!
//!     light.turn_off().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! Requests look like
//! `{"method":"setPilot","params":{"state":true,"r":255,"g":100,"dimming":50}}`.
//! Channel and dimming values of zero are omitted, so they cannot be sent
//! explicitly. Replies carry the echoed method, the firmware `env` and a
//! `result.success` flag.
//!
//! ## Logging
//!
//! Events go through the [`log`] facade: a debug line per datagram written and
//! per reply decoded, and an error line for each failed send while pulsing.
//! Install any logger in the application to see them.
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod config;
mod errors;
mod light;
mod message;
mod pulse;
mod reply;
pub mod runtime;
mod transport;
mod types;

// Re-export public API
pub use config::LightConfig;
pub use errors::Error;
pub use light::Light;
pub use message::{Message, Method, Params};
pub use pulse::{CancelToken, PulseHandle, PulsePhase};
pub use reply::{Reply, ReplyResult};
pub use transport::{RECV_BUFFER_SIZE, Transport};
pub use types::Colors;
