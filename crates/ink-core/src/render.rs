use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "hide the native pointer" toggle.
///
/// Every trail in the process shares it, the same way a page shares one
/// cursor-hiding style element.
static NATIVE_CURSOR_HIDDEN: AtomicBool = AtomicBool::new(false);

/// Whether the native pointer is currently hidden.
pub fn native_cursor_hidden() -> bool {
    NATIVE_CURSOR_HIDDEN.load(Ordering::Relaxed)
}

/// Set the process-wide native pointer toggle.
pub fn set_native_cursor_hidden(hidden: bool) {
    NATIVE_CURSOR_HIDDEN.store(hidden, Ordering::Relaxed);
}

/// The presentation side of a trail.
///
/// The chain calls `apply_transform` once per node per frame, in chain
/// order, whether or not the trail is visible.
pub trait TrailRenderer {
    fn apply_transform(&mut self, node: usize, x: f32, y: f32, scale: f32);

    fn set_visible(&mut self, visible: bool);

    /// Hide or show the system pointer while the trail is enabled.
    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        set_native_cursor_hidden(hidden);
    }
}

impl<R: TrailRenderer + ?Sized> TrailRenderer for Box<R> {
    fn apply_transform(&mut self, node: usize, x: f32, y: f32, scale: f32) {
        (**self).apply_transform(node, x, y, scale);
    }

    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible);
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        (**self).set_native_cursor_hidden(hidden);
    }
}

/// A single renderer call, for renderers that queue or forward work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    Transform { node: usize, x: f32, y: f32, scale: f32 },
    Visible(bool),
    NativeCursorHidden(bool),
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl TrailRenderer for NullRenderer {
    fn apply_transform(&mut self, _node: usize, _x: f32, _y: f32, _scale: f32) {}

    fn set_visible(&mut self, _visible: bool) {}

    fn set_native_cursor_hidden(&mut self, _hidden: bool) {}
}

/// Keeps every call in order. Useful for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub commands: Vec<RenderCommand>,
    pub visible: bool,
    pub native_cursor_hidden: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transforms recorded so far, as `(node, x, y, scale)`.
    pub fn transforms(&self) -> impl Iterator<Item = (usize, f32, f32, f32)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            RenderCommand::Transform { node, x, y, scale } => Some((node, x, y, scale)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl TrailRenderer for RecordingRenderer {
    fn apply_transform(&mut self, node: usize, x: f32, y: f32, scale: f32) {
        self.commands.push(RenderCommand::Transform { node, x, y, scale });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.commands.push(RenderCommand::Visible(visible));
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        self.native_cursor_hidden = hidden;
        self.commands.push(RenderCommand::NativeCursorHidden(hidden));
    }
}
