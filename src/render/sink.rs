//! The `Sink` capability (§6): the renderer hands the sink fully formatted
//! bytes; the sink owns where they go.

use crate::error::RenderError;

/// Accepts a rendered document's bytes. A `Sink` is responsible for its own
/// byte-level transport; the renderer never inspects what happens after
/// `write` returns.
pub trait Sink {
    fn write(&mut self, rendered: &str) -> Result<(), RenderError>;
}

/// Writes to a `std::io::Write`, mapping I/O failures to `SinkFailure` (§7).
pub struct WriterSink<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> WriterSink<W> {
    pub fn new(inner: W) -> WriterSink<W> {
        WriterSink { inner }
    }
}

impl<W: std::io::Write> Sink for WriterSink<W> {
    fn write(&mut self, rendered: &str) -> Result<(), RenderError> {
        self.inner
            .write_all(rendered.as_bytes())
            .map_err(|e| RenderError::SinkFailure(e.to_string()))
    }
}

/// Collects the rendered output in memory; used by tests and by callers
/// that want the string directly rather than a stream.
#[derive(Debug, Default)]
pub struct StringSink {
    pub buffer: String,
}

impl Sink for StringSink {
    fn write(&mut self, rendered: &str) -> Result<(), RenderError> {
        self.buffer.push_str(rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_accumulates_writes() {
        let mut sink = StringSink::default();
        sink.write("a").unwrap();
        sink.write("b").unwrap();
        assert_eq!(sink.buffer, "ab");
    }

    #[test]
    fn writer_sink_surfaces_io_failure_as_sink_failure() {
        struct AlwaysFails;
        impl std::io::Write for AlwaysFails {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut sink = WriterSink::new(AlwaysFails);
        let err = sink.write("x").unwrap_err();
        assert!(matches!(err, RenderError::SinkFailure(_)));
    }
}
