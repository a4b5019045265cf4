//! Shared helpers for the dispatch tests.

use std::cell::RefCell;

use vlink::{ExecError, LinkExecutor, QosDirection, QosMapping, VlanFlag, VlanId};

/// One executor call, as the dispatcher made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        base: String,
        name: String,
        vlan_id: u16,
    },
    Delete {
        name: String,
    },
    Flag {
        name: String,
        flag: VlanFlag,
        enabled: bool,
    },
    Qos {
        name: String,
        direction: QosDirection,
        skb_priority: u32,
        vlan_pcp: u8,
    },
}

/// Executor that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<Call>>,
    /// stderr-like text to fail every call with.
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<(), ExecError> {
        self.calls.borrow_mut().push(call);
        match &self.fail_with {
            Some(message) => Err(ExecError::failed("recorded", 2, message)),
            None => Ok(()),
        }
    }
}

impl LinkExecutor for RecordingExecutor {
    async fn create_vlan_link(
        &self,
        base: &str,
        name: &str,
        vlan_id: VlanId,
    ) -> Result<(), ExecError> {
        self.record(Call::Create {
            base: base.into(),
            name: name.into(),
            vlan_id: vlan_id.get(),
        })
    }

    async fn delete_link(&self, name: &str) -> Result<(), ExecError> {
        self.record(Call::Delete { name: name.into() })
    }

    async fn set_link_flag(
        &self,
        name: &str,
        flag: VlanFlag,
        enabled: bool,
    ) -> Result<(), ExecError> {
        self.record(Call::Flag {
            name: name.into(),
            flag,
            enabled,
        })
    }

    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError> {
        self.record(Call::Qos {
            name: name.into(),
            direction,
            skb_priority: mapping.skb_priority,
            vlan_pcp: mapping.vlan_pcp,
        })
    }
}
