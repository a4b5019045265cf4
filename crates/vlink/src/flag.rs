//! Legacy numeric VLAN flags.

use std::fmt;

use crate::error::{Error, Result};
use crate::netlink::link::vlan;

/// Per-link VLAN behaviour flag, numbered as the legacy tool numbered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VlanFlag {
    ReorderHdr = 1,
    Gvrp = 2,
    Mvrp = 3,
    LooseBinding = 4,
}

impl VlanFlag {
    /// Look up a flag by its legacy number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(VlanFlag::ReorderHdr),
            2 => Some(VlanFlag::Gvrp),
            3 => Some(VlanFlag::Mvrp),
            4 => Some(VlanFlag::LooseBinding),
            _ => None,
        }
    }

    /// Link attribute name, as `ip link ... type vlan` spells it.
    pub fn attribute(self) -> &'static str {
        match self {
            VlanFlag::ReorderHdr => "reorder_hdr",
            VlanFlag::Gvrp => "gvrp",
            VlanFlag::Mvrp => "mvrp",
            VlanFlag::LooseBinding => "loose_binding",
        }
    }

    /// Bit in `struct ifla_vlan_flags`.
    ///
    /// Not the legacy number: the kernel puts loose_binding before mvrp.
    pub fn kernel_bit(self) -> u32 {
        match self {
            VlanFlag::ReorderHdr => vlan::VLAN_FLAG_REORDER_HDR,
            VlanFlag::Gvrp => vlan::VLAN_FLAG_GVRP,
            VlanFlag::Mvrp => vlan::VLAN_FLAG_MVRP,
            VlanFlag::LooseBinding => vlan::VLAN_FLAG_LOOSE_BINDING,
        }
    }
}

impl fmt::Display for VlanFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Translate `set_flag` arguments into a flag and its new state.
///
/// With `flag` omitted this is the two-argument shorthand, which always
/// targets `reorder_hdr`.
pub fn translate(flag: Option<&str>, value: &str) -> Result<(VlanFlag, bool)> {
    let flag = match flag {
        None => VlanFlag::ReorderHdr,
        Some(raw) => parse_number(raw).ok_or_else(|| Error::InvalidFlag {
            field: "flag-num",
            value: raw.to_string(),
            reason: "must be 1, 2, 3 or 4",
        })?,
    };

    let enabled = match value {
        "0" => false,
        "1" => true,
        _ => {
            return Err(Error::InvalidFlag {
                field: "flag value",
                value: value.to_string(),
                reason: "must be 0 or 1",
            });
        }
    };

    Ok((flag, enabled))
}

fn parse_number(raw: &str) -> Option<VlanFlag> {
    match raw.as_bytes() {
        [d @ b'1'..=b'4'] => VlanFlag::from_number(d - b'0'),
        _ => None,
    }
}
