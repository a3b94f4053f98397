//! Channel intensities sent with a color command.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// White, red, blue and green intensities (0-255 each).
///
/// A zero channel is left out of the command entirely, so the bulb cannot be
/// told to set a channel to exactly 0.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub white: u8,
    pub red: u8,
    pub blue: u8,
    pub green: u8,
}

impl Colors {
    /// Create a color with the given RGB values and no white channel.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            white: 0,
            red,
            blue,
            green,
        }
    }

    /// Create a color with the given RGB values plus a white channel.
    pub fn rgbw(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Self {
            white,
            ..Self::rgb(red, green, blue)
        }
    }
}

impl FromStr for Colors {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,100,0" or "255,100,0,30").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid channel value: {e}"))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            [r, g, b, w] => Ok(Self::rgbw(*r, *g, *b, *w)),
            _ => Err("Expected format: r,g,b or r,g,b,w".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        let colors = Colors::from_str("255, 100,0").unwrap();
        assert_eq!(colors, Colors::rgb(255, 100, 0));
        assert_eq!(colors.white, 0);
    }

    #[test]
    fn test_parse_rgbw() {
        let colors = Colors::from_str("1,2,3,4").unwrap();
        assert_eq!(
            colors,
            Colors {
                white: 4,
                red: 1,
                blue: 3,
                green: 2
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Colors::from_str("1,2").is_err());
        assert!(Colors::from_str("1,2,300").is_err());
        assert!(Colors::from_str("a,b,c").is_err());
    }
}
