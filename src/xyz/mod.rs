//! XYZ plain-text decoding: one `x y z [r g b]` record per line.
//!
//! Color range is detected per line: if any of the three channels exceeds
//! 1.0 all three are treated as 0-255 values.

use std::io::BufRead;

use crate::color::{normalize_u8, WHITE};
use crate::core::{Pacer, PointCloud, Progress, XYZ_PROGRESS_INTERVAL};
use crate::util::{Result, Vec3, Vec4};

/// Parse one line. `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<(Vec3, Vec4)> {
    let values: Vec<&str> = line.split_whitespace().collect();
    if values.len() < 3 {
        return None;
    }
    let float = |i: usize| values[i].parse::<f32>().ok();

    let position = Vec3::new(float(0)?, float(1)?, float(2)?);
    if values.len() < 6 {
        return Some((position, WHITE));
    }

    let color = match (float(3), float(4), float(5)) {
        (Some(r), Some(g), Some(b)) => {
            let is_0_255 = r > 1.0 || g > 1.0 || b > 1.0;
            if is_0_255 {
                Vec4::new(normalize_u8(r), normalize_u8(g), normalize_u8(b), 1.0)
            } else {
                Vec4::new(r, g, b, 1.0)
            }
        }
        _ => WHITE,
    };
    Some((position, color))
}

/// Decode an XYZ stream. The point total is unknown, so progress events
/// carry a total of 0.
pub fn decode<R: BufRead>(mut reader: R, progress: &mut dyn Progress) -> Result<PointCloud> {
    let mut cloud = PointCloud::new();
    let mut pacer = Pacer::new(progress, XYZ_PROGRESS_INTERVAL, 0);
    let mut skipped = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some((p, c)) => {
                cloud.push(p, c);
                pacer.tick();
            }
            None => skipped += 1,
        }
    }
    pacer.finish();

    if skipped > 0 {
        tracing::warn!(skipped, "skipped malformed XYZ lines");
    }
    Ok(cloud)
}
