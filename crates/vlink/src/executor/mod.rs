//! Link operation backends.
//!
//! A [`LinkExecutor`] applies one validated operation to the system. Two
//! backends exist:
//!
//! - [`NetlinkExecutor`] talks rtnetlink directly.
//! - [`IpCommand`] runs `ip(8)`, like the legacy wrapper did.
//!
//! Neither checks that the named links exist; whatever the kernel or `ip`
//! reports is surfaced as [`ExecError`].

mod iproute;
mod netlink;

pub use iproute::{IP_CMD, IpCommand, IpInvocation};
pub use netlink::NetlinkExecutor;

use crate::flag::VlanFlag;
use crate::qos::{QosDirection, QosMapping};
use crate::vlan_id::VlanId;

/// Failure of the underlying link operation.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// rtnetlink request failed.
    #[error(transparent)]
    Netlink(#[from] crate::netlink::Error),

    /// The external tool could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and failed. `message` is its stderr.
    #[error("{message}")]
    Failed {
        command: String,
        status: i32,
        message: String,
    },
}

impl ExecError {
    /// Failure of `command` with exit `status`; falls back to a generic
    /// message when the tool printed nothing.
    pub fn failed(command: impl Into<String>, status: i32, stderr: &str) -> Self {
        let command = command.into();
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!("command failed with status {status}: {command}")
        } else {
            stderr.to_string()
        };
        ExecError::Failed {
            command,
            status,
            message,
        }
    }
}

/// Backend that carries out link operations.
#[allow(async_fn_in_trait)]
pub trait LinkExecutor {
    /// Create VLAN `vlan_id` on `base`, named `name`.
    async fn create_vlan_link(&self, base: &str, name: &str, vlan_id: VlanId)
    -> Result<(), ExecError>;

    /// Delete the link called `name`.
    async fn delete_link(&self, name: &str) -> Result<(), ExecError>;

    /// Set or clear one VLAN flag on `name`.
    async fn set_link_flag(&self, name: &str, flag: VlanFlag, enabled: bool)
    -> Result<(), ExecError>;

    /// Add one entry to the egress or ingress priority map of `name`.
    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError>;
}

impl<T: LinkExecutor + ?Sized> LinkExecutor for &T {
    async fn create_vlan_link(
        &self,
        base: &str,
        name: &str,
        vlan_id: VlanId,
    ) -> Result<(), ExecError> {
        (**self).create_vlan_link(base, name, vlan_id).await
    }

    async fn delete_link(&self, name: &str) -> Result<(), ExecError> {
        (**self).delete_link(name).await
    }

    async fn set_link_flag(
        &self,
        name: &str,
        flag: VlanFlag,
        enabled: bool,
    ) -> Result<(), ExecError> {
        (**self).set_link_flag(name, flag, enabled).await
    }

    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError> {
        (**self).set_qos_map(name, direction, mapping).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_keeps_stderr() {
        let err = ExecError::failed(
            "ip link delete eth0.5",
            1,
            "Cannot find device \"eth0.5\"\n",
        );
        assert_eq!(err.to_string(), "Cannot find device \"eth0.5\"");
    }

    #[test]
    fn test_failed_without_stderr() {
        let err = ExecError::failed("ip link delete eth0.5", 2, "");
        assert_eq!(
            err.to_string(),
            "command failed with status 2: ip link delete eth0.5"
        );
    }
}
