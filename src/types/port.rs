//! Port ranges and the range expression parser.
//!
//! A range expression is either empty (every port), a single port `N`, or an
//! inclusive range `N1:N2`. Bounds may be given in either order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;

/// Error type for port range parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("cannot interpret given port range")]
    TooManySegments,
    #[error("invalid port number '{value}'")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// An inclusive range of ports.
///
/// The bounds are normalized on construction, so `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    low: u16,
    high: u16,
}

impl PortRange {
    /// Create a range from two bounds given in any order.
    pub const fn new(a: u16, b: u16) -> Self {
        if a > b {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: u16) -> Self {
        Self {
            low: port,
            high: port,
        }
    }

    /// Every TCP port, 0 through 65535.
    pub const fn full() -> Self {
        Self {
            low: 0,
            high: u16::MAX,
        }
    }

    pub const fn low(&self) -> u16 {
        self.low
    }

    pub const fn high(&self) -> u16 {
        self.high
    }

    /// Number of ports in the range. Never zero.
    pub const fn len(&self) -> usize {
        (self.high - self.low) as usize + 1
    }

    /// Always false; a range holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub const fn contains(&self, port: u16) -> bool {
        port >= self.low && port <= self.high
    }

    /// Iterate over all ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.low..=self.high
    }

    /// Collect the range into an explicit port list.
    pub fn to_ports(&self) -> Vec<u16> {
        self.iter().collect()
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}:{}", self.low, self.high)
        }
    }
}

impl PortRange {
    /// Parse a range expression, keeping only the part inside `0..=65535`.
    ///
    /// Bounds are read as signed integers and may lie outside the port
    /// domain; such ports can never accept a connection, so they are simply
    /// dropped. `Ok(None)` means no port of the expression is reachable.
    pub fn parse_expr(s: &str) -> Result<Option<Self>, PortError> {
        if s.is_empty() {
            return Ok(Some(Self::full()));
        }

        let segments: Vec<&str> = s.split(':').collect();
        let (a, b) = match segments.as_slice() {
            [port] => {
                let port = parse_bound(port)?;
                (port, port)
            }
            [low, high] => (parse_bound(low)?, parse_bound(high)?),
            _ => return Err(PortError::TooManySegments),
        };

        let (low, high) = if a > b { (b, a) } else { (a, b) };
        let low = low.max(0);
        let high = high.min(i64::from(u16::MAX));
        if low > high {
            return Ok(None);
        }

        // Both bounds lie in 0..=65535 here
        Ok(Some(Self::new(low as u16, high as u16)))
    }
}

fn parse_bound(segment: &str) -> Result<i64, PortError> {
    segment.parse().map_err(|source| PortError::InvalidNumber {
        value: segment.to_string(),
        source,
    })
}

/// Expand a range expression into the list of ports to probe.
///
/// The order of the returned ports carries no meaning to the scanner.
/// Out-of-domain bounds are not an error; they just contribute no ports.
pub fn expand(spec: &str) -> Result<Vec<u16>, PortError> {
    Ok(PortRange::parse_expr(spec)?
        .map(|range| range.to_ports())
        .unwrap_or_default())
}
