//! Reading and writing pack files.
//!
//! Packs are written pretty-printed with two-space indentation, keys in
//! insertion order, and every non-ASCII character escaped, so the files diff
//! cleanly in review.

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::document::Pack;
use crate::error::{MigrateError, SchemaError};

/// Prefix marking the pre-migration copy of a file.
pub const SOURCE_PREFIX: char = '_';

/// `<root>/<category>/_<name>`, where a step reads from.
pub fn source_path(root: &Path, category: &str, name: &str) -> PathBuf {
    root.join(category).join(format!("{SOURCE_PREFIX}{name}"))
}

/// `<root>/<category>/<name>`, where a step writes to.
pub fn dest_path(root: &Path, category: &str, name: &str) -> PathBuf {
    root.join(category).join(name)
}

/// Parse a pack from JSON text.
pub fn parse_pack(text: &str, path: &Path) -> Result<Pack, MigrateError> {
    let value: Value = serde_json::from_str(text).map_err(|source| MigrateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(pack) => Ok(pack),
        _ => Err(MigrateError::in_file(
            path,
            SchemaError::WrongType {
                at: "pack".into(),
                expected: "an object of animations",
            },
        )),
    }
}

/// Read and parse the pack at `path`.
pub fn read_pack(path: &Path) -> Result<Pack, MigrateError> {
    let text = std::fs::read_to_string(path).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pack(&text, path)
}

/// Render a pack the way it is stored on disk.
pub fn render_pack(pack: &Pack) -> Result<String, MigrateError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter::new());
    pack.serialize(&mut ser).map_err(MigrateError::Render)?;
    // The formatter only emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `pack` to `path`, replacing any previous content.
///
/// The whole document is rendered before the file is touched.
pub fn write_pack(path: &Path, pack: &Pack) -> Result<(), MigrateError> {
    let text = render_pack(pack)?;
    std::fs::write(path, text).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Pretty printer that writes every non-ASCII character as a `\uXXXX`
/// escape, using surrogate pairs outside the BMP.
pub struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiFormatter<'_> {
    pub fn new() -> Self {
        Self {
            pretty: PrettyFormatter::new(),
        }
    }
}

impl Default for AsciiFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
