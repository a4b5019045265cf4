//! 802.1Q VLAN identifier.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// IEEE 802.1Q VLAN identifier (1-4094).
///
/// VLAN 0 (priority tagged frames) and 4095 are reserved.
///
/// Parsing is strictly decimal: `"010"` is ten, never eight, and `"0x10"` is
/// rejected rather than read as sixteen. The [`Display`](fmt::Display) form is
/// always plain decimal with no leading zeros, so whatever consumes it cannot
/// reinterpret the base either.
///
/// # Examples
///
/// ```
/// use vlink::VlanId;
///
/// let vid: VlanId = "010".parse().unwrap();
/// assert_eq!(vid.get(), 10);
/// assert_eq!(vid.to_string(), "10");
/// assert_eq!(vid.padded(), "0010");
///
/// assert!("0x10".parse::<VlanId>().is_err());
/// assert!("4095".parse::<VlanId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID.
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID.
    pub const MAX: u16 = 4094;

    /// Creates a VLAN ID, or `None` if `id` is outside 1-4094.
    pub const fn new(id: u16) -> Option<Self> {
        if id >= Self::MIN && id <= Self::MAX {
            Some(VlanId(id))
        } else {
            None
        }
    }

    /// Returns the VLAN ID as a u16.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Decimal form zero-padded to four digits (`5` -> `"0005"`).
    pub fn padded(self) -> String {
        format!("{:04}", self.0)
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidVlanId {
            value: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }

        // Leading zeros carry no meaning; anything longer than four
        // significant digits is out of range whatever it says.
        let digits = s.trim_start_matches('0');
        if digits.len() > 4 {
            return Err(invalid("out of range 1..4094"));
        }
        let id = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u16>()
                .map_err(|_| invalid("must be a decimal number"))?
        };

        VlanId::new(id).ok_or_else(|| invalid("out of range 1..4094"))
    }
}

impl From<VlanId> for u16 {
    fn from(vid: VlanId) -> u16 {
        vid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<VlanId> {
        s.parse()
    }

    #[test]
    fn test_every_valid_id_round_trips() {
        for n in VlanId::MIN..=VlanId::MAX {
            let vid = parse(&n.to_string()).unwrap();
            assert_eq!(vid.get(), n);
            assert_eq!(vid.to_string(), n.to_string());
        }
    }

    #[test]
    fn test_out_of_range() {
        for s in ["0", "4095", "4096", "65535", "65536", "99999999999999999999"] {
            assert!(
                matches!(parse(s), Err(Error::InvalidVlanId { .. })),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn test_leading_zeros_are_decimal() {
        assert_eq!(parse("010").unwrap(), parse("10").unwrap());
        assert_eq!(parse("010").unwrap().to_string(), "10");
        assert_eq!(parse("0009").unwrap().get(), 9);
        assert_eq!(parse("000000004094").unwrap().get(), 4094);
        assert!(parse("0000").is_err());
    }

    #[test]
    fn test_malformed() {
        for s in ["", "0x10", "+5", "-5", "5 ", " 5", "1e3", "five", "１０"] {
            assert!(
                matches!(parse(s), Err(Error::InvalidVlanId { .. })),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_names_the_input() {
        let err = parse("0x10").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid vlan_id '0x10': must be a decimal number"
        );
    }

    #[test]
    fn test_padded() {
        assert_eq!(VlanId::new(5).unwrap().padded(), "0005");
        assert_eq!(VlanId::new(4094).unwrap().padded(), "4094");
    }
}
