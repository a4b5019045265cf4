//! vconfig-compatible VLAN configuration.
//!
//! This crate reimplements the legacy `vconfig` command surface (`add`,
//! `rem`, `set_flag`, `set_egress_map`, `set_ingress_map`, `set_name_type`)
//! on top of the modern link interfaces: rtnetlink directly, or `ip(8)`.
//!
//! # Example
//!
//! ```ignore
//! use vlink::{Dispatcher, FileStore, NetlinkExecutor};
//!
//! let executor = NetlinkExecutor::new()?;
//! let mut dispatcher = Dispatcher::new(executor, FileStore::default());
//!
//! dispatcher.run(&["set_name_type", "VLAN_PLUS_VID_NO_PAD"]).await?;
//! dispatcher.run(&["add", "eth0", "5"]).await?; // creates vlan5
//! dispatcher.run(&["set_egress_map", "vlan5", "5", "3"]).await?;
//! ```
//!
//! # Modules
//!
//! - [`command`]: argument parsing into a validated [`Command`]
//! - [`dispatch`]: the [`Dispatcher`] that runs commands
//! - [`executor`]: rtnetlink and `ip(8)` backends
//! - [`netlink`]: the minimal rtnetlink client behind [`NetlinkExecutor`]
//! - [`store`]: the persisted [`NameStyle`]

pub mod command;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod flag;
pub mod name_style;
pub mod netlink;
pub mod qos;
pub mod store;
pub mod util;
pub mod vlan_id;

pub use command::{Command, USAGE, Verb};
pub use dispatch::{Dispatcher, Outcome};
pub use error::{Error, ErrorKind, Result};
pub use executor::{ExecError, IpCommand, IpInvocation, LinkExecutor, NetlinkExecutor};
pub use flag::VlanFlag;
pub use name_style::NameStyle;
pub use qos::{QosDirection, QosMapping};
pub use store::{DEFAULT_STATE_FILE, FileStore, MemoryStore, NameStyleStore};
pub use vlan_id::VlanId;
