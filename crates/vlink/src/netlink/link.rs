//! VLAN link request builders.
//!
//! Three requests cover the whole legacy command surface:
//!
//! - [`VlanLink`] creates an 802.1Q link on top of a parent device.
//! - [`VlanChange`] modifies flags and QoS mappings of an existing VLAN link.
//! - [`delete_link`] removes a link by name.
//!
//! Existing links are addressed by `IFLA_IFNAME` with `ifi_index = 0`, so the
//! kernel resolves the name and reports `ENODEV` itself.
//!
//! # Example
//!
//! ```ignore
//! use vlink::netlink::Connection;
//! use vlink::netlink::link::{VlanChange, VlanLink};
//!
//! let conn = Connection::new()?;
//! conn.request_ack(VlanLink::new("eth0.100", "eth0", 100).build()?).await?;
//! conn.request_ack(VlanChange::new("eth0.100").egress_qos(5, 3).build()).await?;
//! ```

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::builder::MessageBuilder;
use super::connection::ack_request;
use super::error::{Error, Result};
use super::message::{NLM_F_ACK, NLM_F_CREATE, NLM_F_EXCL, NLM_F_REQUEST, NlMsgType};
use crate::util::ifname;

/// `struct ifinfomsg`. Every request here leaves it zeroed: AF_UNSPEC,
/// no index, no flag changes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfInfoMsg {
    pub ifi_family: u8,
    pub __ifi_pad: u8,
    pub ifi_type: u16,
    pub ifi_index: i32,
    pub ifi_flags: u32,
    pub ifi_change: u32,
}

/// Interface link attributes (IFLA_*) used here.
pub mod ifla {
    pub const IFNAME: u16 = 3;
    pub const LINK: u16 = 5;
    pub const LINKINFO: u16 = 18;

    /// Nested under IFLA_LINKINFO.
    pub const INFO_KIND: u16 = 1;
    pub const INFO_DATA: u16 = 2;
}

/// VLAN-specific attributes (IFLA_VLAN_*) and flag bits.
pub mod vlan {
    pub const IFLA_VLAN_ID: u16 = 1;
    pub const IFLA_VLAN_FLAGS: u16 = 2;
    pub const IFLA_VLAN_EGRESS_QOS: u16 = 3;
    pub const IFLA_VLAN_INGRESS_QOS: u16 = 4;

    /// Nested under IFLA_VLAN_{EGRESS,INGRESS}_QOS.
    pub const IFLA_VLAN_QOS_MAPPING: u16 = 1;

    pub const VLAN_FLAG_REORDER_HDR: u32 = 0x1;
    pub const VLAN_FLAG_GVRP: u32 = 0x2;
    pub const VLAN_FLAG_LOOSE_BINDING: u32 = 0x4;
    pub const VLAN_FLAG_MVRP: u32 = 0x8;
}

/// VLAN flags structure (struct ifla_vlan_flags).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct VlanFlags {
    pub flags: u32,
    pub mask: u32,
}

impl VlanFlags {
    /// Set or clear `bit`, marking it as changed.
    pub fn set(&mut self, bit: u32, enabled: bool) {
        self.mask |= bit;
        if enabled {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }
}

/// One QoS mapping entry (struct ifla_vlan_qos_mapping).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct VlanQosMapping {
    pub from: u32,
    pub to: u32,
}

/// Configuration for a new VLAN interface.
#[derive(Debug, Clone)]
pub struct VlanLink {
    name: String,
    parent: String,
    vlan_id: u16,
}

impl VlanLink {
    /// `name` on top of `parent`, tagging with `vlan_id`.
    pub fn new(name: impl Into<String>, parent: impl Into<String>, vlan_id: u16) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            vlan_id,
        }
    }

    /// Build the RTM_NEWLINK request, resolving the parent's ifindex.
    pub fn build(&self) -> Result<MessageBuilder> {
        let parent_index = ifname::name_to_index(&self.parent)
            .map_err(|_| Error::NoSuchInterface(self.parent.clone()))?;
        Ok(self.build_with_parent(parent_index))
    }

    /// Build the request against a known parent ifindex.
    pub fn build_with_parent(&self, parent_index: u32) -> MessageBuilder {
        let mut builder = MessageBuilder::new(
            NlMsgType::RTM_NEWLINK,
            NLM_F_REQUEST | NLM_F_ACK | NLM_F_CREATE | NLM_F_EXCL,
        );
        builder.append(&IfInfoMsg::default());
        builder.append_attr_str(ifla::IFNAME, &self.name);
        builder.append_attr_u32(ifla::LINK, parent_index);

        builder.nested(ifla::LINKINFO, |b| {
            b.append_attr_str(ifla::INFO_KIND, "vlan");
            b.nested(ifla::INFO_DATA, |b| {
                b.append_attr_u16(vlan::IFLA_VLAN_ID, self.vlan_id);
            });
        });

        builder
    }
}

/// Modification of an existing VLAN interface.
///
/// # Example
///
/// ```ignore
/// use vlink::netlink::link::{VlanChange, vlan};
///
/// let change = VlanChange::new("eth0.100").flag(vlan::VLAN_FLAG_GVRP, true);
/// conn.request_ack(change.build()).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct VlanChange {
    name: String,
    flags: VlanFlags,
    egress: Vec<VlanQosMapping>,
    ingress: Vec<VlanQosMapping>,
}

impl VlanChange {
    /// Start a change for the VLAN interface called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set or clear one VLAN flag bit (see [`vlan`]).
    pub fn flag(mut self, bit: u32, enabled: bool) -> Self {
        self.flags.set(bit, enabled);
        self
    }

    /// Map outgoing skb priority `from` to PCP `to`.
    pub fn egress_qos(mut self, from: u32, to: u32) -> Self {
        self.egress.push(VlanQosMapping { from, to });
        self
    }

    /// Map incoming PCP `from` to skb priority `to`.
    pub fn ingress_qos(mut self, from: u32, to: u32) -> Self {
        self.ingress.push(VlanQosMapping { from, to });
        self
    }

    /// Build the RTM_NEWLINK request (no NLM_F_CREATE, so it only modifies).
    pub fn build(&self) -> MessageBuilder {
        let mut builder = ack_request(NlMsgType::RTM_NEWLINK);
        builder.append(&IfInfoMsg::default());
        builder.append_attr_str(ifla::IFNAME, &self.name);

        builder.nested(ifla::LINKINFO, |b| {
            b.append_attr_str(ifla::INFO_KIND, "vlan");
            b.nested(ifla::INFO_DATA, |b| {
                if self.flags.mask != 0 {
                    b.append_attr(vlan::IFLA_VLAN_FLAGS, self.flags.as_bytes());
                }
                append_qos(b, vlan::IFLA_VLAN_EGRESS_QOS, &self.egress);
                append_qos(b, vlan::IFLA_VLAN_INGRESS_QOS, &self.ingress);
            });
        });

        builder
    }
}

fn append_qos(builder: &mut MessageBuilder, attr: u16, mappings: &[VlanQosMapping]) {
    if mappings.is_empty() {
        return;
    }
    builder.nested(attr, |b| {
        for mapping in mappings {
            b.append_attr(vlan::IFLA_VLAN_QOS_MAPPING, mapping.as_bytes());
        }
    });
}

/// Build an RTM_DELLINK request for the link called `name`.
pub fn delete_link(name: &str) -> MessageBuilder {
    let mut builder = ack_request(NlMsgType::RTM_DELLINK);
    builder.append(&IfInfoMsg::default());
    builder.append_attr_str(ifla::IFNAME, name);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{AttrIter, attr_str};
    use crate::netlink::message::{NLMSG_HDRLEN, NlMsgHdr};

    const IFINFO_LEN: usize = std::mem::size_of::<IfInfoMsg>();

    fn attrs(msg: &[u8]) -> Vec<(u16, Vec<u8>)> {
        AttrIter::new(&msg[NLMSG_HDRLEN + IFINFO_LEN..])
            .map(|(k, v)| (k, v.to_vec()))
            .collect()
    }

    fn find(attrs: &[(u16, Vec<u8>)], kind: u16) -> Vec<u8> {
        attrs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| panic!("attribute {} missing", kind))
    }

    fn info_data(msg: &[u8]) -> Vec<(u16, Vec<u8>)> {
        let linkinfo = find(&attrs(msg), ifla::LINKINFO);
        let inner: Vec<_> = AttrIter::new(&linkinfo)
            .map(|(k, v)| (k, v.to_vec()))
            .collect();
        assert_eq!(attr_str(&find(&inner, ifla::INFO_KIND)).unwrap(), "vlan");
        AttrIter::new(&find(&inner, ifla::INFO_DATA))
            .map(|(k, v)| (k, v.to_vec()))
            .collect()
    }

    #[test]
    fn test_ifinfomsg_size() {
        assert_eq!(IFINFO_LEN, 16);
    }

    #[test]
    fn test_create_request() {
        let msg = VlanLink::new("eth0.5", "eth0", 5)
            .build_with_parent(2)
            .finish();
        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_type, NlMsgType::RTM_NEWLINK);
        assert_ne!(header.nlmsg_flags & NLM_F_CREATE, 0);
        assert_ne!(header.nlmsg_flags & NLM_F_EXCL, 0);
        assert_eq!(header.nlmsg_len as usize, msg.len());

        let top = attrs(&msg);
        assert_eq!(attr_str(&find(&top, ifla::IFNAME)).unwrap(), "eth0.5");
        assert_eq!(find(&top, ifla::LINK), 2u32.to_ne_bytes());
        assert_eq!(find(&info_data(&msg), vlan::IFLA_VLAN_ID), 5u16.to_ne_bytes());
    }

    #[test]
    fn test_create_unknown_parent() {
        let err = VlanLink::new("nope0.5", "nope0", 5).build().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_flag_request() {
        let msg = VlanChange::new("eth0.10")
            .flag(vlan::VLAN_FLAG_MVRP, true)
            .flag(vlan::VLAN_FLAG_REORDER_HDR, false)
            .build()
            .finish();
        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_flags & NLM_F_CREATE, 0);

        let raw = find(&info_data(&msg), vlan::IFLA_VLAN_FLAGS);
        let flags = VlanFlags::read_from_bytes(&raw[..]).unwrap();
        assert_eq!(flags.flags, vlan::VLAN_FLAG_MVRP);
        assert_eq!(flags.mask, vlan::VLAN_FLAG_MVRP | vlan::VLAN_FLAG_REORDER_HDR);
    }

    #[test]
    fn test_qos_requests() {
        let msg = VlanChange::new("eth0.10")
            .ingress_qos(2, 4)
            .build()
            .finish();
        let data = info_data(&msg);
        assert!(data.iter().all(|(k, _)| *k != vlan::IFLA_VLAN_EGRESS_QOS));

        let nest = find(&data, vlan::IFLA_VLAN_INGRESS_QOS);
        let entries: Vec<_> = AttrIter::new(&nest).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, vlan::IFLA_VLAN_QOS_MAPPING);
        let mapping = VlanQosMapping::read_from_bytes(entries[0].1).unwrap();
        assert_eq!(mapping, VlanQosMapping { from: 2, to: 4 });
    }

    #[test]
    fn test_delete_request() {
        let msg = delete_link("vlan0005").finish();
        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_type, NlMsgType::RTM_DELLINK);
        assert_eq!(attr_str(&find(&attrs(&msg), ifla::IFNAME)).unwrap(), "vlan0005");
    }
}
