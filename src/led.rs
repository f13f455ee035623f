/*!
 # LED channels

 Identifiers and on/off state for the controller's three output channels.
*/

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Identifies one of the three LED channels (1..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedId(u8);

impl LedId {
    /// Lowest valid channel number
    pub const MIN: u8 = 1;
    /// Highest valid channel number
    pub const MAX: u8 = 3;

    /// All channels in ascending order
    pub const ALL: [LedId; 3] = [LedId(1), LedId(2), LedId(3)];

    /// Channel number as sent on the wire
    pub fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LedId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(LedId(value))
        } else {
            Err(Error::InvalidLed(value.to_string()))
        }
    }
}

impl FromStr for LedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLed(s.to_string()))?;
        LedId::try_from(value)
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requested power state of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

impl LedState {
    /// Only the exact label `"on"` means on; every other label means off.
    pub fn from_label(label: &str) -> Self {
        if label == "on" {
            LedState::On
        } else {
            LedState::Off
        }
    }

    /// Value of the `state` query parameter
    pub fn query_value(self) -> u8 {
        match self {
            LedState::On => 1,
            LedState::Off => 0,
        }
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedState::On => write!(f, "on"),
            LedState::Off => write!(f, "off"),
        }
    }
}
