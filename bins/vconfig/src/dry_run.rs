//! `--dry-run`: print the ip(8) command for each operation.

use std::path::{Path, PathBuf};

use vlink::{ExecError, IpInvocation, LinkExecutor, QosDirection, QosMapping, VlanFlag, VlanId};

pub struct DryRun {
    program: PathBuf,
}

impl DryRun {
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
        }
    }

    fn print(&self, invocation: IpInvocation) -> Result<(), ExecError> {
        println!("{}", invocation.command_line(&self.program));
        Ok(())
    }
}

impl LinkExecutor for DryRun {
    async fn create_vlan_link(
        &self,
        base: &str,
        name: &str,
        vlan_id: VlanId,
    ) -> Result<(), ExecError> {
        self.print(IpInvocation::create_vlan_link(base, name, vlan_id))
    }

    async fn delete_link(&self, name: &str) -> Result<(), ExecError> {
        self.print(IpInvocation::delete_link(name))
    }

    async fn set_link_flag(
        &self,
        name: &str,
        flag: VlanFlag,
        enabled: bool,
    ) -> Result<(), ExecError> {
        self.print(IpInvocation::set_link_flag(name, flag, enabled))
    }

    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError> {
        self.print(IpInvocation::set_qos_map(name, direction, mapping))
    }
}
