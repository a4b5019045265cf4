//! `ip(8)` backend.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use super::{ExecError, LinkExecutor};
use crate::flag::VlanFlag;
use crate::qos::{QosDirection, QosMapping};
use crate::vlan_id::VlanId;

/// Default `ip` program, looked up in `PATH`.
pub const IP_CMD: &str = "ip";

const MODPROBE_CMD: &str = "modprobe";
const VLAN_MODULE: &str = "8021q";
const SYSFS_MODULE: &str = "/sys/module";

/// Arguments of one `ip link` call, without the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpInvocation {
    args: Vec<String>,
}

impl IpInvocation {
    fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `link add link <base> name <name> type vlan id <vid>`
    pub fn create_vlan_link(base: &str, name: &str, vlan_id: VlanId) -> Self {
        Self::new([
            "link".to_string(),
            "add".into(),
            "link".into(),
            base.into(),
            "name".into(),
            name.into(),
            "type".into(),
            "vlan".into(),
            "id".into(),
            vlan_id.to_string(),
        ])
    }

    /// `link delete <name>`
    pub fn delete_link(name: &str) -> Self {
        Self::new(["link", "delete", name])
    }

    /// `link set dev <name> type vlan <flag> on|off`
    pub fn set_link_flag(name: &str, flag: VlanFlag, enabled: bool) -> Self {
        let state = if enabled { "on" } else { "off" };
        Self::new([
            "link",
            "set",
            "dev",
            name,
            "type",
            "vlan",
            flag.attribute(),
            state,
        ])
    }

    /// `link set dev <name> type vlan egress-qos-map <skb>:<pcp>` or
    /// `... ingress-qos-map <pcp>:<skb>`
    pub fn set_qos_map(name: &str, direction: QosDirection, mapping: QosMapping) -> Self {
        let (from, to) = mapping.kernel_pair(direction);
        Self::new([
            "link".to_string(),
            "set".into(),
            "dev".into(),
            name.into(),
            "type".into(),
            "vlan".into(),
            direction.keyword().into(),
            format!("{from}:{to}"),
        ])
    }

    /// Arguments, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full command line for `program`, for display.
    pub fn command_line(&self, program: &Path) -> String {
        let mut line = program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for IpInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line(Path::new(IP_CMD)))
    }
}

/// Runs `ip(8)` for each operation.
#[derive(Debug, Clone)]
pub struct IpCommand {
    program: PathBuf,
}

impl IpCommand {
    /// Use `program` as the `ip` binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run one invocation, turning a non-zero exit into [`ExecError::Failed`].
    pub async fn run(&self, invocation: &IpInvocation) -> Result<(), ExecError> {
        let line = invocation.command_line(&self.program);
        tracing::debug!(command = %line, "executing");

        let output = Command::new(&self.program)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let status = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(command = %line, status, "command failed");
        Err(ExecError::failed(line, status, &stderr))
    }

    /// Load the 802.1Q module if it is not there yet.
    ///
    /// Failure only warns: `ip` will report the real problem, and the module
    /// may be built in or autoloaded.
    async fn ensure_vlan_module(&self) {
        if Path::new(SYSFS_MODULE).join(VLAN_MODULE).exists() {
            return;
        }
        tracing::debug!(module = VLAN_MODULE, "loading kernel module");

        let result = Command::new(MODPROBE_CMD)
            .arg(VLAN_MODULE)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;
        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => tracing::warn!(
                module = VLAN_MODULE,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "modprobe failed"
            ),
            Err(e) => tracing::warn!(module = VLAN_MODULE, error = %e, "cannot run modprobe"),
        }
    }
}

impl Default for IpCommand {
    fn default() -> Self {
        Self::new(IP_CMD)
    }
}

impl LinkExecutor for IpCommand {
    async fn create_vlan_link(
        &self,
        base: &str,
        name: &str,
        vlan_id: VlanId,
    ) -> Result<(), ExecError> {
        self.ensure_vlan_module().await;
        self.run(&IpInvocation::create_vlan_link(base, name, vlan_id))
            .await
    }

    async fn delete_link(&self, name: &str) -> Result<(), ExecError> {
        self.run(&IpInvocation::delete_link(name)).await
    }

    async fn set_link_flag(
        &self,
        name: &str,
        flag: VlanFlag,
        enabled: bool,
    ) -> Result<(), ExecError> {
        self.run(&IpInvocation::set_link_flag(name, flag, enabled))
            .await
    }

    async fn set_qos_map(
        &self,
        name: &str,
        direction: QosDirection,
        mapping: QosMapping,
    ) -> Result<(), ExecError> {
        self.run(&IpInvocation::set_qos_map(name, direction, mapping))
            .await
    }
}
