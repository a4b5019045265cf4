//! 802.1p priority mappings for VLAN links.

use std::fmt;

use crate::error::{Error, Result};

/// Highest Priority Code Point.
pub const MAX_PCP: u8 = 7;

/// Which mapping table of a VLAN link an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QosDirection {
    /// Outgoing frames: skb priority -> PCP.
    Egress,
    /// Incoming frames: PCP -> skb priority.
    Ingress,
}

impl QosDirection {
    /// Keyword used by `ip link ... type vlan`.
    pub fn keyword(self) -> &'static str {
        match self {
            QosDirection::Egress => "egress-qos-map",
            QosDirection::Ingress => "ingress-qos-map",
        }
    }
}

impl fmt::Display for QosDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QosDirection::Egress => f.write_str("egress"),
            QosDirection::Ingress => f.write_str("ingress"),
        }
    }
}

/// One skb priority <-> PCP pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QosMapping {
    pub skb_priority: u32,
    pub vlan_pcp: u8,
}

impl QosMapping {
    /// Validate the two numeric arguments of `set_egress_map` /
    /// `set_ingress_map`. Both commands take them in the same order.
    pub fn parse(skb_priority: &str, vlan_pcp: &str) -> Result<Self> {
        let skb = parse_decimal(skb_priority).ok_or_else(|| Error::InvalidQosValue {
            field: "skb_priority",
            value: skb_priority.to_string(),
            reason: "must be a non-negative decimal number",
        })?;

        let pcp_error = |reason| Error::InvalidQosValue {
            field: "vlan_qos",
            value: vlan_pcp.to_string(),
            reason,
        };
        let pcp = parse_decimal(vlan_pcp).ok_or_else(|| pcp_error("must be 0-7"))?;
        if pcp > u32::from(MAX_PCP) {
            return Err(pcp_error("must be 0-7"));
        }

        Ok(QosMapping {
            skb_priority: skb,
            vlan_pcp: pcp as u8,
        })
    }

    /// `(from, to)` as the kernel's mapping table for `direction` keys it.
    pub fn kernel_pair(self, direction: QosDirection) -> (u32, u32) {
        match direction {
            QosDirection::Egress => (self.skb_priority, u32::from(self.vlan_pcp)),
            QosDirection::Ingress => (u32::from(self.vlan_pcp), self.skb_priority),
        }
    }
}

/// Digits only, no sign. Overflow is rejected.
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let m = QosMapping::parse("5", "3").unwrap();
        assert_eq!(m.skb_priority, 5);
        assert_eq!(m.vlan_pcp, 3);

        let m = QosMapping::parse("4294967295", "7").unwrap();
        assert_eq!(m.skb_priority, u32::MAX);
        assert_eq!(m.vlan_pcp, 7);

        assert_eq!(QosMapping::parse("007", "0").unwrap().skb_priority, 7);
    }

    #[test]
    fn test_pcp_out_of_range() {
        for pcp in ["8", "255", "256", "99999999999", "-1", "", "0x1", "3.0"] {
            let err = QosMapping::parse("5", pcp).unwrap_err();
            assert!(
                matches!(err, Error::InvalidQosValue { field: "vlan_qos", .. }),
                "{pcp:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bad_priority() {
        for skb in ["-1", "", "4294967296", "five", "+1"] {
            let err = QosMapping::parse(skb, "3").unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidQosValue {
                    field: "skb_priority",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_priority_checked_first() {
        let err = QosMapping::parse("x", "9").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidQosValue {
                field: "skb_priority",
                ..
            }
        ));
    }

    #[test]
    fn test_kernel_pair() {
        let m = QosMapping::parse("4", "2").unwrap();
        assert_eq!(m.kernel_pair(QosDirection::Egress), (4, 2));
        assert_eq!(m.kernel_pair(QosDirection::Ingress), (2, 4));
    }
}
