//! rtnetlink backend.

use super::{ExecError, LinkExecutor};
use crate::flag::VlanFlag;
use crate::netlink::link::{VlanChange, VlanLink, delete_link};
use crate::netlink::{self, Connection};
use crate::qos::{QosDirection, QosMapping};
use crate::vlan_id::VlanId;

/// Applies link operations over a NETLINK_ROUTE socket.
pub struct NetlinkExecutor {
    conn: Connection,
}

impl NetlinkExecutor {
    /// Open the rtnetlink socket.
    pub fn new() -> netlink::Result<Self> {
        Ok(Self {
            conn: Connection::new()?,
        })
    }
}

impl LinkExecutor for NetlinkExecutor {
    async fn create_vlan_link(
        &self,
        base: &str,
        name: &str,
        vlan_id: VlanId,
    ) -> Result<(), ExecError> {
        let request = VlanLink::new(name, base, vlan_id.get()).build()?;
        self.conn
            .request_ack(request)
            .await
            .map_err(|e| e.with_context(format!("creating {name} on {base}")))?;
        Ok(())
    }

    async fn delete_link(&self, name: &str) -> Result<(), ExecError> {
        self.conn
            .request_ack(delete_link(name))
            .await
            .map_err(|e| e.with_context(format!("deleting {name}")))?;
        Ok(())
    }

    async fn set_link_flag(
        &self,
        name: &str,
        flag: VlanFlag,
        enabled: bool,
    ) -> Result<(), ExecError> {
        let request = VlanChange::new(name)
            .flag(flag.kernel_bit(), enabled)
            .build();
        self.conn
            .request_ack(request)
            .await
            .map_err(|e| e.with_context(format!("setting {flag} on {name}")))?;
        Ok(())
    }

    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError> {
        let (from, to) = mapping.kernel_pair(direction);
        let change = VlanChange::new(name);
        let change = match direction {
            QosDirection::Egress => change.egress_qos(from, to),
            QosDirection::Ingress => change.ingress_qos(from, to),
        };
        self.conn
            .request_ack(change.build())
            .await
            .map_err(|e| e.with_context(format!("setting {direction} map on {name}")))?;
        Ok(())
    }
}
