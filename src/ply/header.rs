//! PLY header parsing.
//!
//! The header is always text. It is consumed line by line up to and
//! including the `end_header` line, leaving the reader positioned at the
//! first body byte.

use std::io::BufRead;

use crate::util::{Error, Result, ScalarType};
use super::PropertyTable;

/// Body encoding declared by the `format` directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlyFormat {
    #[default]
    Ascii,
    BinaryLittleEndian,
}

/// What the decoder keeps from the header.
#[derive(Clone, Debug, Default)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub vertex_count: usize,
    /// Scalar properties of the `vertex` element, in declaration order.
    pub properties: PropertyTable,
}

const END_HEADER: &str = "end_header";

/// Read the header from `reader`.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader> {
    let mut header = PlyHeader::default();
    let mut in_vertex = false;
    let mut seen_vertex = false;
    // Non-empty element declared ahead of `vertex`
    let mut leading: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(Error::malformed("missing end_header"));
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line == END_HEADER {
            break;
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("format") => {
                header.format = match parts.next() {
                    Some("ascii") => PlyFormat::Ascii,
                    Some("binary_little_endian") => PlyFormat::BinaryLittleEndian,
                    Some("binary_big_endian") => return Err(Error::BigEndianUnsupported),
                    other => {
                        return Err(Error::UnsupportedFormat(other.unwrap_or_default().to_string()))
                    }
                };
            }
            Some("element") => {
                let name = parts.next().unwrap_or_default();
                let count = parts.next().unwrap_or_default();
                in_vertex = name == "vertex";
                if in_vertex {
                    // The body is read from its first byte as vertex data
                    if let Some(other) = &leading {
                        return Err(Error::malformed(format!("element {other} precedes vertex")));
                    }
                    seen_vertex = true;
                    header.vertex_count = count
                        .parse()
                        .map_err(|_| Error::malformed(format!("invalid vertex count: {count}")))?;
                } else if !seen_vertex && leading.is_none() && count.parse::<usize>().map_or(true, |n| n > 0) {
                    leading = Some(name.to_string());
                }
            }
            Some("property") if in_vertex => match (parts.next(), parts.next()) {
                // Face topology, not a vertex attribute
                (Some("list"), _) => {}
                (Some(ty), Some(name)) => {
                    header.properties.push(name, ScalarType::from_ply_name(ty));
                }
                _ => {}
            },
            // `ply` magic, comment, obj_info and anything unknown
            _ => {}
        }
    }

    tracing::debug!(
        format = ?header.format,
        vertices = header.vertex_count,
        properties = header.properties.len(),
        stride = header.properties.stride(),
        "parsed PLY header"
    );
    Ok(header)
}
