//! Legacy VLAN link naming styles.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::vlan_id::VlanId;

/// How a VLAN link name is derived from its base interface and id.
///
/// | style | `eth0`, 5 |
/// |---|---|
/// | `VLAN_PLUS_VID` | `vlan0005` |
/// | `VLAN_PLUS_VID_NO_PAD` | `vlan5` |
/// | `DEV_PLUS_VID` | `eth0.0005` |
/// | `DEV_PLUS_VID_NO_PAD` | `eth0.5` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameStyle {
    VlanPlusVid,
    VlanPlusVidNoPad,
    DevPlusVid,
    #[default]
    DevPlusVidNoPad,
}

impl NameStyle {
    /// All styles, in legacy order.
    pub const ALL: [NameStyle; 4] = [
        NameStyle::VlanPlusVid,
        NameStyle::VlanPlusVidNoPad,
        NameStyle::DevPlusVid,
        NameStyle::DevPlusVidNoPad,
    ];

    /// The literal name accepted by `set_name_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            NameStyle::VlanPlusVid => "VLAN_PLUS_VID",
            NameStyle::VlanPlusVidNoPad => "VLAN_PLUS_VID_NO_PAD",
            NameStyle::DevPlusVid => "DEV_PLUS_VID",
            NameStyle::DevPlusVidNoPad => "DEV_PLUS_VID_NO_PAD",
        }
    }

    /// Render the link name for `vlan_id` on `base`.
    ///
    /// The `VLAN_PLUS_VID*` styles ignore `base`.
    pub fn render(self, base: &str, vlan_id: VlanId) -> String {
        match self {
            NameStyle::VlanPlusVid => format!("vlan{}", vlan_id.padded()),
            NameStyle::VlanPlusVidNoPad => format!("vlan{}", vlan_id),
            NameStyle::DevPlusVid => format!("{}.{}", base, vlan_id.padded()),
            NameStyle::DevPlusVidNoPad => format!("{}.{}", base, vlan_id),
        }
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameStyle {
    type Err = Error;

    /// Case-sensitive: only the four literal names are accepted.
    fn from_str(s: &str) -> Result<Self> {
        NameStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| Error::UnknownNameType(s.to_string()))
    }
}
