//! Interface name and index utilities.

use std::path::Path;

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Where the kernel exposes network devices.
const SYSFS_NET: &str = "/sys/class/net";

/// Error type for interface operations.
#[derive(Debug, thiserror::Error)]
pub enum IfError {
    #[error("interface not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidName(&'static str),
}

pub type Result<T> = std::result::Result<T, IfError>;

/// Validate an interface name the way the kernel's `dev_valid_name` does.
pub fn validate(name: &str) -> Result<()> {
    let problem = match name {
        "" => Some("name is empty"),
        "." | ".." => Some("name is reserved"),
        _ if name.len() >= IFNAMSIZ => Some("name too long (max 15 bytes)"),
        _ if name.contains(['/', ':', '\0']) => Some("name contains invalid characters"),
        _ if name.contains(char::is_whitespace) => Some("name contains whitespace"),
        _ => None,
    };
    problem.map_or(Ok(()), |reason| Err(IfError::InvalidName(reason)))
}

/// Look up an interface's ifindex in sysfs.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;

    let path = Path::new(SYSFS_NET).join(name).join("ifindex");
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| content.trim().parse().ok())
        .ok_or_else(|| IfError::NotFound(name.to_owned()))
}
