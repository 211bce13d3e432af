//! Output writers for search results.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

/// Opens `path` for writing, or stdout when no path is given.
pub fn open(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout())),
    }
}

/// Writes a single JSON document followed by a newline.
pub fn write_document(out: &mut dyn Write, document: &Value, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, document)?;
    } else {
        serde_json::to_writer(&mut *out, document)?;
    }
    out.write_all(b"\n")?;
    out.flush()
}

/// Writes one JSON object per line and flushes, so records show up as they stream.
pub fn write_line(out: &mut dyn Write, record: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    out.flush()
}
