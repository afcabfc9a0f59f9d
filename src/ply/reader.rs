//! PLY body decoding.

use std::io::{BufRead, Read};

use crate::color::{normalize_u8, sh_to_unit, sigmoid, WHITE};
use crate::core::{Pacer, PointCloud, Progress, PLY_PROGRESS_INTERVAL};
use crate::util::{Error, Result, Vec3, Vec4};
use super::{read_header, PlyFormat, PlyHeader, PropertyTable, Slot};

/// Upper bound on up-front allocation for ASCII bodies, whose vertex
/// count is only a claim until the lines are read.
const MAX_PREALLOC: usize = 1 << 20;

/// Where point colors come from, resolved once per file.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ColorSource {
    /// `red`/`green`/`blue`, scaled by 1/255 when `red` is 8-bit unsigned.
    Rgb {
        rgb: [Slot; 3],
        alpha: Option<Slot>,
        scale: bool,
    },
    /// `f_dc_0..2` spherical-harmonics coefficients, optional logit `opacity`.
    ShDc { dc: [Slot; 3], opacity: Option<Slot> },
    White,
}

/// Field assignment for position and color.
#[derive(Clone, Copy, Debug, PartialEq)]
struct VertexLayout {
    position: [Slot; 3],
    color: ColorSource,
}

impl VertexLayout {
    fn resolve(table: &PropertyTable) -> Result<Self> {
        let position = table
            .slots3(["x", "y", "z"])
            .ok_or(Error::MissingPositionFields)?;

        let color = if let Some(rgb) = table.slots3(["red", "green", "blue"]) {
            ColorSource::Rgb {
                rgb,
                alpha: table.slot("alpha"),
                scale: rgb[0].ty.is_u8(),
            }
        } else if let Some(dc) = table.slots3(["f_dc_0", "f_dc_1", "f_dc_2"]) {
            ColorSource::ShDc {
                dc,
                opacity: table.slot("opacity"),
            }
        } else {
            ColorSource::White
        };
        tracing::debug!(?color, "resolved PLY color source");

        Ok(Self { position, color })
    }

    /// Assemble one point; `read` yields `None` for absent or unparsable values.
    #[inline]
    fn point(&self, read: impl Fn(Slot) -> Option<f32>) -> (Vec3, Vec4) {
        let [x, y, z] = self.position.map(|s| read(s).unwrap_or(0.0));
        let position = Vec3::new(x, y, z);

        let color = match self.color {
            ColorSource::Rgb { rgb, alpha, scale } => {
                let channel = |s: Slot, per_slot_scale: bool| {
                    read(s).map_or(1.0, |v| if per_slot_scale { normalize_u8(v) } else { v })
                };
                let [r, g, b] = rgb.map(|s| channel(s, scale));
                let a = alpha.map_or(1.0, |s| channel(s, s.ty.is_u8()));
                Vec4::new(r, g, b, a)
            }
            ColorSource::ShDc { dc, opacity } => {
                let [r, g, b] = dc.map(|s| read(s).map_or(1.0, sh_to_unit));
                let a = opacity.and_then(&read).map_or(1.0, sigmoid);
                Vec4::new(r, g, b, a)
            }
            ColorSource::White => WHITE,
        };
        (position, color)
    }
}

/// Decode a PLY stream: header, then ASCII or little-endian binary body.
pub fn decode<R: BufRead>(mut reader: R, progress: &mut dyn Progress) -> Result<PointCloud> {
    let header = read_header(&mut reader)?;
    let layout = VertexLayout::resolve(&header.properties)?;

    match header.format {
        PlyFormat::BinaryLittleEndian => decode_binary(reader, &header, &layout, progress),
        PlyFormat::Ascii => decode_ascii(reader, &header, &layout, progress),
    }
}

fn decode_binary<R: Read>(
    reader: R,
    header: &PlyHeader,
    layout: &VertexLayout,
    progress: &mut dyn Progress,
) -> Result<PointCloud> {
    let stride = header.properties.stride();
    let span = header
        .vertex_count
        .checked_mul(stride)
        .ok_or_else(|| Error::malformed("vertex data span overflows"))?;

    let mut body = Vec::new();
    reader.take(span as u64).read_to_end(&mut body)?;

    let records = body.len() / stride;
    if records < header.vertex_count {
        tracing::warn!(
            declared = header.vertex_count,
            available = records,
            "PLY body truncated, decoding complete records only"
        );
    }

    let mut cloud = PointCloud::with_capacity(records);
    let mut pacer = Pacer::new(progress, PLY_PROGRESS_INTERVAL, header.vertex_count);
    for record in body.chunks_exact(stride) {
        let (p, c) = layout.point(|s| s.read_binary(record));
        cloud.push(p, c);
        pacer.tick();
    }
    pacer.finish();
    Ok(cloud)
}

fn decode_ascii<R: BufRead>(
    mut reader: R,
    header: &PlyHeader,
    layout: &VertexLayout,
    progress: &mut dyn Progress,
) -> Result<PointCloud> {
    let mut cloud = PointCloud::with_capacity(header.vertex_count.min(MAX_PREALLOC));
    let mut pacer = Pacer::new(progress, PLY_PROGRESS_INTERVAL, header.vertex_count);
    let mut short_lines = 0usize;
    let mut buf = Vec::new();

    while cloud.len() < header.vertex_count {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }
        if columns.len() < header.properties.len() {
            short_lines += 1;
        }

        let (p, c) = layout.point(|s| s.read_ascii(&columns));
        cloud.push(p, c);
        pacer.tick();
    }
    pacer.finish();

    if short_lines > 0 {
        tracing::warn!(short_lines, "PLY body has short vertex lines, missing values defaulted");
    }
    if cloud.len() < header.vertex_count {
        tracing::warn!(
            declared = header.vertex_count,
            read = cloud.len(),
            "PLY body ended early"
        );
    }
    Ok(cloud)
}
