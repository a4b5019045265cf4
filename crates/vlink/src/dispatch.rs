//! Command dispatch.
//!
//! A [`Dispatcher`] owns one executor and one name-style store and carries a
//! command from raw arguments to a finished link operation:
//!
//! 1. parse the verb,
//! 2. validate its arguments (and, for `add`, the name it will create),
//! 3. hand the request to the executor,
//! 4. report what happened.
//!
//! Every validation error is returned before the executor is touched, and
//! executor failures are returned as they are, never retried.

use tracing::debug;

use crate::command::Command;
use crate::error::Result;
use crate::executor::LinkExecutor;
use crate::flag::VlanFlag;
use crate::name_style::NameStyle;
use crate::qos::{QosDirection, QosMapping};
use crate::store::NameStyleStore;
use crate::vlan_id::VlanId;

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        base: String,
        name: String,
        vlan_id: VlanId,
    },
    Removed {
        name: String,
    },
    FlagSet {
        name: String,
        flag: VlanFlag,
        enabled: bool,
    },
    QosMapSet {
        name: String,
        direction: QosDirection,
        mapping: QosMapping,
    },
    NameTypeSaved(NameStyle),
}

/// Runs legacy commands against a [`LinkExecutor`].
pub struct Dispatcher<E, S> {
    executor: E,
    store: S,
    name_style: NameStyle,
}

impl<E: LinkExecutor, S: NameStyleStore> Dispatcher<E, S> {
    /// Create a dispatcher, reading the current name style from `store`.
    pub fn new(executor: E, store: S) -> Self {
        let name_style = store.load();
        debug!(%name_style, "loaded name-type");
        Self::with_name_style(executor, store, name_style)
    }

    /// Create a dispatcher with a name style the caller already loaded.
    pub fn with_name_style(executor: E, store: S, name_style: NameStyle) -> Self {
        Self {
            executor,
            store,
            name_style,
        }
    }

    /// Style used to name links created by `add`.
    pub fn name_style(&self) -> NameStyle {
        self.name_style
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Name `add` would give to VLAN `vlan_id` on `base`.
    pub fn link_name(&self, base: &str, vlan_id: VlanId) -> String {
        self.name_style.render(base, vlan_id)
    }

    /// Parse and run one invocation.
    pub async fn run<A: AsRef<str>>(&mut self, args: &[A]) -> Result<Outcome> {
        let command = Command::parse(args)?;
        debug!(verb = command.verb().as_str(), "parsed");
        self.dispatch(command).await
    }

    /// [`Command::validate`] against this dispatcher's name style.
    pub fn validate(&self, command: &Command) -> Result<()> {
        command.validate(self.name_style)
    }

    /// Run an already parsed command.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        self.validate(&command)?;
        debug!(?command, "validated");

        let outcome = match command {
            Command::Add { base, vlan_id } => {
                let name = self.link_name(&base, vlan_id);
                debug!(%base, %name, %vlan_id, "dispatching create");
                self.executor.create_vlan_link(&base, &name, vlan_id).await?;
                Outcome::Created {
                    base,
                    name,
                    vlan_id,
                }
            }
            Command::Rem { name } => {
                debug!(%name, "dispatching delete");
                self.executor.delete_link(&name).await?;
                Outcome::Removed { name }
            }
            Command::SetFlag {
                name,
                flag,
                enabled,
            } => {
                debug!(%name, %flag, enabled, "dispatching flag change");
                self.executor.set_link_flag(&name, flag, enabled).await?;
                Outcome::FlagSet {
                    name,
                    flag,
                    enabled,
                }
            }
            Command::SetQosMap {
                name,
                direction,
                mapping,
            } => {
                debug!(%name, %direction, ?mapping, "dispatching qos map");
                self.executor.set_qos_map(&name, direction, mapping).await?;
                Outcome::QosMapSet {
                    name,
                    direction,
                    mapping,
                }
            }
            Command::SetNameType(style) => {
                self.store.save(style)?;
                self.name_style = style;
                Outcome::NameTypeSaved(style)
            }
        };

        debug!(?outcome, "done");
        Ok(outcome)
    }
}
