//! Outbound message seam.
//!
//! Session management, presence and protocol framing stay with the transport
//! behind [`Delivery`]. Delivery is fire-and-forget from the engine's side.

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

pub const XHTML_IM_NS: &str = "http://jabber.org/protocol/xhtml-im";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// A chat notification ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub plain_body: String,
    /// Complete XHTML-IM payload, absent when rich rendering fell back.
    pub rich_body: Option<String>,
}

impl OutboundMessage {
    pub fn has_rich_body(&self) -> bool {
        self.rich_body.is_some()
    }
}

/// Wraps an already validated rich fragment into an XHTML-IM envelope.
pub fn xhtml_im_envelope(fragment: &str) -> String {
    format!("<html xmlns='{XHTML_IM_NS}'><body xmlns='{XHTML_NS}'>{fragment}</body></html>")
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Delivery: Send + Sync + 'static {
    async fn deliver(
        &self,
        message: OutboundMessage,
    ) -> Result<()>;
}
