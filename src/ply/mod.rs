//! PLY (Polygon File Format) decoding.
//!
//! A text header declares the body encoding, the vertex count and the
//! vertex properties. Position comes from `x`/`y`/`z`; color from
//! `red`/`green`/`blue`, else from the Gaussian-splat `f_dc_*`
//! coefficients, else opaque white. Big-endian bodies are rejected.

mod header;
mod property;
mod reader;

pub use header::{read_header, PlyFormat, PlyHeader};
pub use property::{Field, PropertyTable, Slot};
pub use reader::decode;
