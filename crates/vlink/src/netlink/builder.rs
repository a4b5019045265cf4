//! Request construction.

use bytes::{BufMut, BytesMut};
use zerocopy::{Immutable, IntoBytes};

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, nla_align};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Offsets into `struct nlmsghdr`.
const SEQ_OFFSET: usize = 8;
const PID_OFFSET: usize = 12;

/// A netlink request under construction.
///
/// `nlmsg_len` is filled in by [`finish`](Self::finish). Nested attribute
/// lengths are patched when the closure passed to [`nested`](Self::nested)
/// returns, so a nest can never be left open.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: BytesMut,
}

impl MessageBuilder {
    /// Start a message of `msg_type` with `flags`.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        let mut buf = BytesMut::with_capacity(128);
        buf.put_slice(NlMsgHdr::new(msg_type, flags).as_bytes());
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True while nothing but the header has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == NLMSG_HDRLEN
    }

    /// Append a family header such as `ifinfomsg`.
    pub fn append<T: IntoBytes + Immutable>(&mut self, data: &T) {
        self.buf.put_slice(data.as_bytes());
        self.pad_to(nlmsg_align(self.buf.len()));
    }

    /// Append one attribute carrying `data`.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) {
        self.put_attr_header(attr_type, data.len());
        self.buf.put_slice(data);
        self.pad_to(nla_align(self.buf.len()));
    }

    pub fn append_attr_u16(&mut self, attr_type: u16, value: u16) {
        self.append_attr(attr_type, &value.to_ne_bytes());
    }

    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) {
        self.append_attr(attr_type, &value.to_ne_bytes());
    }

    /// Append a NUL-terminated string attribute.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) {
        self.put_attr_header(attr_type, value.len() + 1);
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        self.pad_to(nla_align(self.buf.len()));
    }

    /// Append a nested attribute whose payload `f` writes.
    pub fn nested<F>(&mut self, attr_type: u16, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start = self.buf.len();
        self.put_attr_header(attr_type | NLA_F_NESTED, 0);
        f(self);

        let len = (self.buf.len() - start) as u16;
        self.buf[start..start + 2].copy_from_slice(&len.to_ne_bytes());
        self.pad_to(nla_align(self.buf.len()));
    }

    pub fn set_seq(&mut self, seq: u32) {
        self.buf[SEQ_OFFSET..SEQ_OFFSET + 4].copy_from_slice(&seq.to_ne_bytes());
    }

    /// Set the sender port id.
    pub fn set_pid(&mut self, pid: u32) {
        self.buf[PID_OFFSET..PID_OFFSET + 4].copy_from_slice(&pid.to_ne_bytes());
    }

    /// Write `nlmsg_len` and return the finished message.
    pub fn finish(mut self) -> Vec<u8> {
        let len = self.buf.len() as u32;
        self.buf[..4].copy_from_slice(&len.to_ne_bytes());
        self.buf.to_vec()
    }

    fn put_attr_header(&mut self, attr_type: u16, payload_len: usize) {
        self.buf.put_u16_ne((NLA_HDRLEN + payload_len) as u16);
        self.buf.put_u16_ne(attr_type);
    }

    fn pad_to(&mut self, len: usize) {
        self.buf.resize(len, 0);
    }
}
