use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Band selected by the `band` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Band {
    #[default]
    Presence,
    Height,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown band '{0}' (expected presence or height)")]
pub struct UnknownBand(pub String);

impl Band {
    /// Name used in query strings and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Presence => "presence",
            Band::Height => "height",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "presence" => Ok(Band::Presence),
            "height" => Ok(Band::Height),
            other => Err(UnknownBand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("presence".parse::<Band>(), Ok(Band::Presence));
        assert_eq!("height".parse::<Band>(), Ok(Band::Height));
        assert_eq!(
            "Height".parse::<Band>(),
            Err(UnknownBand("Height".to_string()))
        );
    }

    #[test]
    fn test_default_is_presence() {
        assert_eq!(Band::default(), Band::Presence);
        assert_eq!(Band::default().to_string(), "presence");
    }
}
