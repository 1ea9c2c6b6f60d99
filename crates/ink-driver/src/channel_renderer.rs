use crossbeam::channel::{unbounded, Receiver, Sender};
use ink_core::{RenderCommand, TrailRenderer};

/// Forwards every renderer call to another thread as a [`RenderCommand`].
///
/// The receiving side owns presentation, including the native cursor
/// toggle, so `NativeCursorHidden` is forwarded rather than applied here.
/// Sends to a dropped receiver are discarded.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: Sender<RenderCommand>,
}

impl ChannelRenderer {
    pub fn new() -> (Self, Receiver<RenderCommand>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    pub fn from_sender(tx: Sender<RenderCommand>) -> Self {
        Self { tx }
    }

    fn forward(&self, command: RenderCommand) {
        let _ = self.tx.send(command);
    }
}

impl TrailRenderer for ChannelRenderer {
    fn apply_transform(&mut self, node: usize, x: f32, y: f32, scale: f32) {
        self.forward(RenderCommand::Transform { node, x, y, scale });
    }

    fn set_visible(&mut self, visible: bool) {
        self.forward(RenderCommand::Visible(visible));
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        self.forward(RenderCommand::NativeCursorHidden(hidden));
    }
}
