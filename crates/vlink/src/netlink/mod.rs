//! Minimal async rtnetlink client for VLAN links.
//!
//! Only what the vconfig commands need is here: one NETLINK_ROUTE socket,
//! a message builder, request/ACK handling with extended-ACK diagnostics,
//! and the VLAN link request builders in [`link`].
//!
//! # Example
//!
//! ```ignore
//! use vlink::netlink::Connection;
//! use vlink::netlink::link::{VlanLink, delete_link};
//!
//! let conn = Connection::new()?;
//! conn.request_ack(VlanLink::new("eth0.5", "eth0", 5).build()?).await?;
//! conn.request_ack(delete_link("eth0.5")).await?;
//! ```

pub mod attr;
mod builder;
pub mod connection;
mod error;
pub mod link;
pub mod message;
mod socket;

pub use attr::AttrIter;
pub use builder::MessageBuilder;
pub use connection::Connection;
pub use error::{Error, Result};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::NetlinkSocket;
