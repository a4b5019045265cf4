//! Errors raised while talking to the kernel over rtnetlink.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The kernel rejected a request.
    ///
    /// `errno` is positive. `ext_ack` is the extended ACK text when the
    /// kernel sent one, and `operation` is filled in by
    /// [`with_context`](Error::with_context).
    #[error("{}", describe_kernel(.operation, .errno, .ext_ack))]
    Kernel {
        operation: Option<String>,
        errno: i32,
        ext_ack: Option<String>,
    },

    #[error("short netlink message: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("malformed netlink reply: {0}")]
    Malformed(String),

    #[error("no such interface: {0}")]
    NoSuchInterface(String),
}

fn describe_kernel(operation: &Option<String>, errno: &i32, ext_ack: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(op) = operation {
        out.push_str(op);
        out.push_str(": ");
    }
    out.push_str(&io::Error::from_raw_os_error(*errno).to_string());
    if let Some(ext) = ext_ack {
        out.push_str(": ");
        out.push_str(ext);
    }
    out
}

impl Error {
    /// Error for a negative errno taken from an `nlmsgerr`.
    pub fn from_errno(errno: i32) -> Self {
        Self::from_errno_ext(errno, None)
    }

    /// Like [`from_errno`](Self::from_errno), keeping the extended ACK text.
    pub fn from_errno_ext(errno: i32, ext_ack: Option<&str>) -> Self {
        Self::Kernel {
            operation: None,
            errno: -errno,
            ext_ack: ext_ack.filter(|s| !s.is_empty()).map(str::to_owned),
        }
    }

    /// Name the operation a kernel error came from. Other errors pass through.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, ext_ack, .. } => Self::Kernel {
                operation: Some(operation.into()),
                errno,
                ext_ack,
            },
            other => other,
        }
    }

    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchInterface(_))
            || matches!(self.errno(), Some(libc::ENOENT | libc::ENODEV))
    }

}
