//! Shared utilities for vlink.

pub mod ifname;

pub use ifname::{IFNAMSIZ, name_to_index, validate};
