//! rtnetlink connection with request/ACK handling.

use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{MessageIter, NLM_F_ACK, NLM_F_REQUEST, NlMsgError};
use super::socket::NetlinkSocket;

/// One rtnetlink socket issuing requests one at a time.
pub struct Connection {
    socket: NetlinkSocket,
}

impl Connection {
    /// Open a new NETLINK_ROUTE connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::new()?,
        })
    }

    /// Send `builder` and wait for its ACK, skipping replies to other sequence numbers.
    pub async fn request_ack(&self, mut builder: MessageBuilder) -> Result<()> {
        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        self.socket.send(&msg).await?;

        loop {
            let response = self.socket.recv_msg().await?;
            if let Some(result) = process_ack(&response, seq) {
                return result;
            }
        }
    }
}

/// Look for the ACK matching `expected_seq` in a receive buffer.
///
/// Returns `None` when the buffer holds nothing for this request.
pub(crate) fn process_ack(data: &[u8], expected_seq: u32) -> Option<Result<()>> {
    for result in MessageIter::new(data) {
        let (header, payload) = match result {
            Ok(msg) => msg,
            Err(e) => return Some(Err(e)),
        };

        if header.nlmsg_seq != expected_seq || !header.is_error() {
            continue;
        }

        let err = match NlMsgError::from_bytes(payload) {
            Ok(err) => err,
            Err(e) => return Some(Err(e)),
        };
        if err.is_ack() {
            return Some(Ok(()));
        }
        let ext = err.ext_ack_message(header.nlmsg_flags, payload);
        return Some(Err(Error::from_errno_ext(err.error, ext)));
    }

    None
}

/// Helper to build a request expecting ACK.
pub fn ack_request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_ACK)
}
