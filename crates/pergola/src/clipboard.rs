//! Best-effort clipboard boundary.
//!
//! Clipboard traffic is keyed by content format and never surfaces failures
//! to widgets: an unavailable clipboard reads as empty and swallows writes.

/// A clipboard content format key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipFormat(pub &'static str);

impl ClipFormat {
    /// Plain UTF-8 text.
    pub const TEXT: Self = Self("text");
}

/// The clipboard surface supplied by the host.
pub trait Clipboard {
    /// Read the clipboard in a format. `None` if empty, unavailable, or not
    /// representable in the format.
    fn read(&mut self, format: ClipFormat) -> Option<String>;

    /// Write the clipboard in a format. Failures are swallowed.
    fn write(&mut self, format: ClipFormat, data: &str);

    /// Poll whether the clipboard changed since the last call. Widgets that
    /// mirror clipboard state check this once per tick.
    fn changed(&mut self) -> bool {
        false
    }
}

/// The no-op clipboard used when the host supplies none.
#[derive(Debug, Default)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn read(&mut self, _format: ClipFormat) -> Option<String> {
        None
    }

    fn write(&mut self, _format: ClipFormat, _data: &str) {}
}
