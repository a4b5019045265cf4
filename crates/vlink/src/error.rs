//! Errors for the vconfig command surface.

use std::path::PathBuf;

use crate::executor::ExecError;

/// Result type for vconfig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a vconfig invocation.
///
/// Validation variants are produced before any link operation is attempted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("missing <{argument}> (usage: {usage})")]
    MissingArgument {
        argument: &'static str,
        usage: &'static str,
    },

    #[error("unexpected argument '{argument}' (usage: {usage})")]
    UnexpectedArgument {
        argument: String,
        usage: &'static str,
    },

    #[error("invalid vlan_id '{value}': {reason}")]
    InvalidVlanId { value: String, reason: &'static str },

    #[error("invalid interface name '{name}': {reason}")]
    InvalidInterfaceName { name: String, reason: String },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidFlag {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidQosValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(
        "unknown name-type '{0}' (expected VLAN_PLUS_VID, VLAN_PLUS_VID_NO_PAD, DEV_PLUS_VID or DEV_PLUS_VID_NO_PAD)"
    )]
    UnknownNameType(String),

    #[error("cannot save name-type to {}: {source}", .path.display())]
    StateStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("must be run as root")]
    PermissionDenied,

    #[error(transparent)]
    Executor(#[from] ExecError),
}

/// Coarse classification of [`Error`], one per exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCommand,
    MissingArgument,
    InvalidVlanId,
    InvalidFlag,
    InvalidQosValue,
    UnknownNameType,
    InvalidInterfaceName,
    ExecutorFailure,
    StateStore,
    PermissionDenied,
}

impl ErrorKind {
    /// Process exit status for this kind of failure.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::UnknownCommand => 2,
            ErrorKind::MissingArgument => 3,
            ErrorKind::InvalidVlanId => 4,
            ErrorKind::InvalidFlag => 5,
            ErrorKind::InvalidQosValue => 6,
            ErrorKind::UnknownNameType => 7,
            ErrorKind::InvalidInterfaceName => 8,
            ErrorKind::ExecutorFailure => 9,
            ErrorKind::StateStore => 10,
            ErrorKind::PermissionDenied => 11,
        }
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownCommand(_) => ErrorKind::UnknownCommand,
            Error::MissingArgument { .. } | Error::UnexpectedArgument { .. } => {
                ErrorKind::MissingArgument
            }
            Error::InvalidVlanId { .. } => ErrorKind::InvalidVlanId,
            Error::InvalidInterfaceName { .. } => ErrorKind::InvalidInterfaceName,
            Error::InvalidFlag { .. } => ErrorKind::InvalidFlag,
            Error::InvalidQosValue { .. } => ErrorKind::InvalidQosValue,
            Error::UnknownNameType(_) => ErrorKind::UnknownNameType,
            Error::StateStore { .. } => ErrorKind::StateStore,
            Error::PermissionDenied => ErrorKind::PermissionDenied,
            Error::Executor(_) => ErrorKind::ExecutorFailure,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::UnknownCommand,
            ErrorKind::MissingArgument,
            ErrorKind::InvalidVlanId,
            ErrorKind::InvalidFlag,
            ErrorKind::InvalidQosValue,
            ErrorKind::UnknownNameType,
            ErrorKind::InvalidInterfaceName,
            ErrorKind::ExecutorFailure,
            ErrorKind::StateStore,
            ErrorKind::PermissionDenied,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|&c| c > 1));
    }

    #[test]
    fn test_messages_name_the_argument() {
        let err = Error::InvalidVlanId {
            value: "4095".into(),
            reason: "out of range 1..4094",
        };
        assert_eq!(err.to_string(), "invalid vlan_id '4095': out of range 1..4094");
        assert_eq!(err.kind(), ErrorKind::InvalidVlanId);

        let err = Error::UnknownCommand("foo".into());
        assert_eq!(err.to_string(), "unknown command 'foo'");
        assert_eq!(err.exit_code(), 2);
    }
}
