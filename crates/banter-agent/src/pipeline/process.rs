//! The relay turn — commands, gate, reconstruct, generate, dispatch.
//!
//! Each inbound message runs as its own task. Two messages landing in the
//! same channel close together can each rebuild history before the other's
//! reply is sent, so replies may interleave or repeat context. That is the
//! accepted cost of keeping the bot stateless — do not serialize per channel
//! here.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::generate::ResponseGenerator;
use crate::pipeline::commands;
use crate::pipeline::gate::ChannelScope;
use crate::pipeline::history;
use crate::platform::ChatPlatform;
use crate::provider::{ChatMessage, Role};
use crate::typing::ComposingHandle;

/// A platform message event, already reduced to what the pipeline needs.
/// The adapter filters out the bot's own messages before constructing one.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: u64,
    pub is_direct: bool,
    pub content: String,
}

/// Process-wide relay state, read-only after startup.
pub struct Relay {
    pub scope: ChannelScope,
    pub generator: ResponseGenerator,
    pub history_limit: u8,
}

impl Relay {
    /// Run one full relay turn for an inbound message.
    ///
    /// 1. Known commands answer immediately, in any channel.
    /// 2. The channel gate decides whether a conversational reply is due.
    /// 3. The composing indicator is held while history is rebuilt and the
    ///    completion endpoint is called.
    /// 4. The reply (or fallback text) is sent; a failed send is logged and
    ///    dropped, never raised.
    pub async fn handle_message(&self, platform: Arc<dyn ChatPlatform>, msg: InboundMessage) {
        if let Some(reply) = commands::dispatch(&msg.content) {
            if let Err(e) = platform.send_text(msg.channel_id, &reply).await {
                warn!(channel_id = msg.channel_id, error = %e, "failed to send command reply");
            }
            return;
        }

        if !self.scope.accepts(msg.channel_id, msg.is_direct) {
            debug!(channel_id = msg.channel_id, "channel not in scope, ignoring");
            return;
        }

        let composing = ComposingHandle::start(Arc::clone(&platform), msg.channel_id);

        let mut window =
            history::reconstruct(platform.as_ref(), msg.channel_id, self.history_limit).await;
        window.push(ChatMessage {
            role: Role::User,
            content: msg.content,
        });

        info!(
            channel_id = msg.channel_id,
            window = window.len(),
            "generating reply"
        );
        let reply = self.generator.generate(&window).await;
        composing.stop();

        if let Err(e) = platform.send_text(msg.channel_id, &reply).await {
            warn!(channel_id = msg.channel_id, error = %e, "failed to send reply");
        }
    }
}
