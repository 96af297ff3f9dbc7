use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to the writer the stream output serializes spans into.
///
/// Cloning is cheap; every clone writes to the same destination.
#[derive(Clone)]
pub struct Sink {
    writer: Arc<Mutex<dyn Write + Send>>,
    label: &'static str,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::labeled(writer, "writer")
    }

    pub fn stdout() -> Self {
        Self::labeled(io::stdout(), "stdout")
    }

    pub fn stderr() -> Self {
        Self::labeled(io::stderr(), "stderr")
    }

    fn labeled<W: Write + Send + 'static>(writer: W, label: &'static str) -> Self {
        let writer: Arc<Mutex<dyn Write + Send>> = Arc::new(Mutex::new(writer));
        Self { writer, label }
    }

    /// A sink is unusable once a writer panicked while holding it
    pub fn is_usable(&self) -> bool {
        !self.writer.is_poisoned()
    }

    pub(crate) fn write_with<F>(&self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| io::Error::other(format!("{} sink is poisoned", self.label)))?;
        f(&mut *guard)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sink").field(&self.label).finish()
    }
}

impl From<SharedBuffer> for Sink {
    fn from(buffer: SharedBuffer) -> Self {
        Self::labeled(buffer, "buffer")
    }
}

/// In-memory writer whose contents stay readable through any clone
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clones_share_contents() {
        let buffer = SharedBuffer::new();
        let sink = Sink::from(buffer.clone());

        sink.write_with(|w| w.write_all(b"span"))
            .expect("write to buffer");

        assert_eq!(buffer.contents(), b"span");
        assert_eq!(buffer.to_string_lossy(), "span");
    }

    #[test]
    fn new_buffer_is_empty() {
        assert!(SharedBuffer::new().is_empty());
    }

    #[test]
    fn sink_debug_shows_label() {
        assert_eq!(format!("{:?}", Sink::stdout()), "Sink(\"stdout\")");
        assert_eq!(format!("{:?}", Sink::new(Vec::new())), "Sink(\"writer\")");
    }

    #[test]
    fn fresh_sink_is_usable() {
        assert!(Sink::stderr().is_usable());
    }
}
