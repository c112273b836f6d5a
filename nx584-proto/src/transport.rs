use std::io::{Read, Write};

/// A byte-stream transport the [`crate::framer::Framer`] can frame and
/// unframe messages over. Implemented by the real serial port in
/// `nx584-bridge` and by an in-memory mock in tests.
pub trait Transport: Read + Write {
    /// Number of bytes currently buffered and ready to read without
    /// blocking. Used by the controller's idle loop to poll the link
    /// without paying the full read timeout on every tick.
    fn bytes_to_read(&self) -> std::io::Result<usize>;

    /// Discard any buffered input. Called after a framing error so a
    /// partial, malformed frame can't corrupt the next read.
    fn flush_input(&mut self) -> std::io::Result<()>;
}
