//! `nlmsghdr` layout, message splitting and `nlmsgerr` decoding.

use std::mem::size_of;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::attr::{AttrIter, attr_str};
use super::error::{Error, Result};

pub const NLMSG_ALIGNTO: usize = 4;

#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

pub const NLMSG_HDRLEN: usize = nlmsg_align(size_of::<NlMsgHdr>());

pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_ACK: u16 = 0x04;
pub const NLM_F_EXCL: u16 = 0x200;
pub const NLM_F_CREATE: u16 = 0x400;

// Only meaningful on NLMSG_ERROR replies.
pub const NLM_F_CAPPED: u16 = 0x100;
pub const NLM_F_ACK_TLVS: u16 = 0x200;

/// `NLMSGERR_ATTR_MSG`: the human-readable extended ACK.
pub const NLMSGERR_ATTR_MSG: u16 = 1;

/// Message types this crate sends or expects back.
pub struct NlMsgType;

impl NlMsgType {
    pub const ERROR: u16 = 2;
    pub const RTM_NEWLINK: u16 = 16;
    pub const RTM_DELLINK: u16 = 17;
}

/// `struct nlmsghdr`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    pub nlmsg_len: u32,
    pub nlmsg_type: u16,
    pub nlmsg_flags: u16,
    pub nlmsg_seq: u32,
    pub nlmsg_pid: u32,
}

/// Borrow a `T` from the start of `data`.
fn read_prefix<T: FromBytes + KnownLayout + Immutable>(data: &[u8]) -> Result<&T> {
    T::ref_from_prefix(data)
        .map(|(value, _)| value)
        .map_err(|_| Error::Truncated {
            expected: size_of::<T>(),
            actual: data.len(),
        })
}

impl NlMsgHdr {
    /// Header for a request with no payload yet.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            ..Default::default()
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        read_prefix(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self)
    }

    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }
}

/// Splits a receive buffer into `(header, payload)` pairs.
///
/// A header whose length runs past the buffer yields one error and ends
/// the iteration.
pub struct MessageIter<'a> {
    rest: &'a [u8],
}

impl<'a> MessageIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.len() < NLMSG_HDRLEN {
            return None;
        }
        let data = std::mem::take(&mut self.rest);

        let header = match NlMsgHdr::from_bytes(data) {
            Ok(header) => header,
            Err(e) => return Some(Err(e)),
        };
        let len = header.nlmsg_len as usize;
        if !(NLMSG_HDRLEN..=data.len()).contains(&len) {
            return Some(Err(Error::Malformed(format!(
                "nlmsg_len {len} with {} bytes left",
                data.len()
            ))));
        }

        self.rest = data.get(nlmsg_align(len)..).unwrap_or_default();
        Some(Ok((header, &data[NLMSG_HDRLEN..len])))
    }
}

/// `struct nlmsgerr`: an errno (0 for a plain ACK) and the offending header.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    pub error: i32,
    pub msg: NlMsgHdr,
}

impl NlMsgError {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        read_prefix(data)
    }

    pub fn is_ack(&self) -> bool {
        self.error == 0
    }

    /// The kernel's extended ACK text, if it attached one.
    ///
    /// `flags` come from the NLMSG_ERROR header. Without `NLM_F_CAPPED` the
    /// whole request is echoed back ahead of the TLVs.
    pub fn ext_ack_message<'a>(&self, flags: u16, payload: &'a [u8]) -> Option<&'a str> {
        if flags & NLM_F_ACK_TLVS == 0 {
            return None;
        }
        let echoed = match flags & NLM_F_CAPPED {
            0 => nlmsg_align(self.msg.nlmsg_len as usize),
            _ => NLMSG_HDRLEN,
        };
        let tlvs = payload.get(size_of::<i32>() + echoed..)?;

        AttrIter::new(tlvs)
            .find(|&(kind, _)| kind == NLMSGERR_ATTR_MSG)
            .and_then(|(_, text)| attr_str(text).ok())
    }
}
