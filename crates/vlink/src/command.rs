//! Legacy command line parsing.
//!
//! [`Command::parse`] turns the positional arguments of one invocation into
//! a fully validated [`Command`]. Nothing here touches the system.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::flag::{self, VlanFlag};
use crate::name_style::NameStyle;
use crate::qos::{QosDirection, QosMapping};
use crate::util::ifname;
use crate::vlan_id::VlanId;

/// Usage text of the legacy command surface.
pub const USAGE: &str = "\
Usage: vconfig [OPTIONS] <COMMAND> [ARGS...]

Commands:
  add             <interface-name> <vlan_id>
  rem             <vlan-name>
  set_flag        <vlan-name> <flag-num> <0|1>
  set_flag        <vlan-name> <0|1>
  set_egress_map  <vlan-name> <skb_priority> <vlan_qos>
  set_ingress_map <vlan-name> <skb_priority> <vlan_qos>
  set_name_type   <name-type>

flag-num:  1 reorder_hdr, 2 gvrp, 3 mvrp, 4 loose_binding
vlan_qos:  0-7
name-type: VLAN_PLUS_VID (vlan0005), VLAN_PLUS_VID_NO_PAD (vlan5),
           DEV_PLUS_VID (eth0.0005), DEV_PLUS_VID_NO_PAD (eth0.5)
";

/// Subcommand names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    Rem,
    SetFlag,
    SetEgressMap,
    SetIngressMap,
    SetNameType,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Add => "add",
            Verb::Rem => "rem",
            Verb::SetFlag => "set_flag",
            Verb::SetEgressMap => "set_egress_map",
            Verb::SetIngressMap => "set_ingress_map",
            Verb::SetNameType => "set_name_type",
        }
    }

    /// One-line usage, quoted in arity errors.
    pub fn usage(self) -> &'static str {
        match self {
            Verb::Add => "add <interface-name> <vlan_id>",
            Verb::Rem => "rem <vlan-name>",
            Verb::SetFlag => "set_flag <vlan-name> [<flag-num>] <0|1>",
            Verb::SetEgressMap => "set_egress_map <vlan-name> <skb_priority> <vlan_qos>",
            Verb::SetIngressMap => "set_ingress_map <vlan-name> <skb_priority> <vlan_qos>",
            Verb::SetNameType => "set_name_type <name-type>",
        }
    }

    /// Names of the positional arguments, the optional ones included.
    fn positionals(self) -> &'static [&'static str] {
        match self {
            Verb::Add => &["interface-name", "vlan_id"],
            Verb::Rem => &["vlan-name"],
            Verb::SetFlag => &["vlan-name", "flag-num", "0|1"],
            Verb::SetEgressMap | Verb::SetIngressMap => {
                &["vlan-name", "skb_priority", "vlan_qos"]
            }
            Verb::SetNameType => &["name-type"],
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Verb::Add),
            "rem" => Ok(Verb::Rem),
            "set_flag" => Ok(Verb::SetFlag),
            "set_egress_map" => Ok(Verb::SetEgressMap),
            "set_ingress_map" => Ok(Verb::SetIngressMap),
            "set_name_type" => Ok(Verb::SetNameType),
            _ => Err(Error::UnknownCommand(s.to_string())),
        }
    }
}

/// A validated legacy command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a VLAN link on `base`; its name comes from the current style.
    Add { base: String, vlan_id: VlanId },
    /// Delete the link called `name`.
    Rem { name: String },
    SetFlag {
        name: String,
        flag: VlanFlag,
        enabled: bool,
    },
    SetQosMap {
        name: String,
        direction: QosDirection,
        mapping: QosMapping,
    },
    SetNameType(NameStyle),
}

impl Command {
    /// Parse `args`, the subcommand first.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let Some((verb, rest)) = args.split_first() else {
            return Err(Error::MissingArgument {
                argument: "command",
                usage: "vconfig <command> [args...]",
            });
        };
        let verb: Verb = verb.as_ref().parse()?;
        let rest: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
        Self::parse_verb(verb, &rest)
    }

    fn parse_verb(verb: Verb, args: &[&str]) -> Result<Self> {
        let command = match (verb, args) {
            (Verb::Add, &[base, vlan_id]) => Command::Add {
                base: interface_name(base)?,
                vlan_id: vlan_id.parse()?,
            },
            (Verb::Rem, &[name]) => Command::Rem {
                name: interface_name(name)?,
            },
            (Verb::SetFlag, &[name, value]) => {
                let name = interface_name(name)?;
                let (flag, enabled) = flag::translate(None, value)?;
                Command::SetFlag {
                    name,
                    flag,
                    enabled,
                }
            }
            (Verb::SetFlag, &[name, flag, value]) => {
                let name = interface_name(name)?;
                let (flag, enabled) = flag::translate(Some(flag), value)?;
                Command::SetFlag {
                    name,
                    flag,
                    enabled,
                }
            }
            (Verb::SetEgressMap, &[name, skb, pcp]) => Command::SetQosMap {
                name: interface_name(name)?,
                direction: QosDirection::Egress,
                mapping: QosMapping::parse(skb, pcp)?,
            },
            (Verb::SetIngressMap, &[name, skb, pcp]) => Command::SetQosMap {
                name: interface_name(name)?,
                direction: QosDirection::Ingress,
                mapping: QosMapping::parse(skb, pcp)?,
            },
            (Verb::SetNameType, &[style]) => Command::SetNameType(style.parse()?),
            _ => return Err(arity_error(verb, args)),
        };

        Ok(command)
    }

    /// The subcommand this was parsed from.
    pub fn verb(&self) -> Verb {
        match self {
            Command::Add { .. } => Verb::Add,
            Command::Rem { .. } => Verb::Rem,
            Command::SetFlag { .. } => Verb::SetFlag,
            Command::SetQosMap {
                direction: QosDirection::Egress,
                ..
            } => Verb::SetEgressMap,
            Command::SetQosMap {
                direction: QosDirection::Ingress,
                ..
            } => Verb::SetIngressMap,
            Command::SetNameType(_) => Verb::SetNameType,
        }
    }

    /// Whether running this command performs a link operation.
    pub fn needs_link(&self) -> bool {
        !matches!(self, Command::SetNameType(_))
    }

    /// Checks that need the active name style: `add` must produce a valid
    /// interface name, which a long base can push past `IFNAMSIZ`.
    pub fn validate(&self, name_style: NameStyle) -> Result<()> {
        if let Command::Add { base, vlan_id } = self {
            validate_link_name(&name_style.render(base, *vlan_id))?;
        }
        Ok(())
    }
}

/// Error for an argument count no form of `verb` accepts.
fn arity_error(verb: Verb, args: &[&str]) -> Error {
    let names = verb.positionals();
    if let Some(extra) = args.get(names.len()) {
        return Error::UnexpectedArgument {
            argument: extra.to_string(),
            usage: verb.usage(),
        };
    }

    // set_flag with one argument is missing its value, not the flag number.
    let argument = match (verb, args.len()) {
        (Verb::SetFlag, 1) => "0|1",
        (_, n) => names.get(n).copied().unwrap_or("argument"),
    };
    Error::MissingArgument {
        argument,
        usage: verb.usage(),
    }
}

fn interface_name(name: &str) -> Result<String> {
    ifname::validate(name).map_err(|e| Error::InvalidInterfaceName {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(name.to_string())
}

fn validate_link_name(name: &str) -> Result<()> {
    interface_name(name).map(drop)
}
