//! `nlattr` layout and parsing.

use super::error::{Error, Result};

pub const NLA_ALIGNTO: usize = 4;

/// `nla_len` plus `nla_type`.
pub const NLA_HDRLEN: usize = 4;

pub const NLA_F_NESTED: u16 = 1 << 15;
const NLA_F_NET_BYTEORDER: u16 = 1 << 14;

#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Walks a run of attributes, yielding `(type, payload)` with the
/// nested and byte-order bits stripped from the type.
///
/// Iteration ends at the first attribute whose length does not fit.
pub struct AttrIter<'a> {
    rest: &'a [u8],
}

impl<'a> AttrIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let &[l0, l1, t0, t1, ..] = self.rest else {
            return None;
        };
        let len = u16::from_ne_bytes([l0, l1]) as usize;
        let kind = u16::from_ne_bytes([t0, t1]) & !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

        if !(NLA_HDRLEN..=self.rest.len()).contains(&len) {
            self.rest = &[];
            return None;
        }

        let payload = &self.rest[NLA_HDRLEN..len];
        self.rest = self.rest.get(nla_align(len)..).unwrap_or_default();
        Some((kind, payload))
    }
}

/// Read a string payload, stopping at the first NUL.
pub fn attr_str(payload: &[u8]) -> Result<&str> {
    let text = payload.split(|&b| b == 0).next().unwrap_or_default();
    std::str::from_utf8(text).map_err(|e| Error::Malformed(format!("string attribute: {e}")))
}

/// Encode one attribute header; used by tests that hand-build replies.
#[cfg(test)]
pub(crate) fn attr_header(kind: u16, payload_len: usize) -> [u8; NLA_HDRLEN] {
    let len = ((NLA_HDRLEN + payload_len) as u16).to_ne_bytes();
    let kind = kind.to_ne_bytes();
    [len[0], len[1], kind[0], kind[1]]
}
