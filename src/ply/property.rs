//! Vertex property table: name lookup, column index, byte offset and stride.

use std::collections::HashMap;

use crate::util::ScalarType;

/// Where one declared field lives inside a vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Column index in an ASCII body.
    pub index: usize,
    /// Byte offset inside a binary record.
    pub offset: usize,
    pub ty: ScalarType,
}

impl Slot {
    /// Decode this field from a binary record.
    #[inline]
    pub fn read_binary(&self, record: &[u8]) -> Option<f32> {
        self.ty.read(record, self.offset).map(|v| v as f32)
    }

    /// Parse this field from the whitespace-split columns of an ASCII line.
    #[inline]
    pub fn read_ascii(&self, columns: &[&str]) -> Option<f32> {
        columns.get(self.index)?.parse::<f32>().ok()
    }
}

/// A declared scalar vertex property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub slot: Slot,
}

/// Ordered vertex properties with by-name lookup.
///
/// List properties never enter the table, so they contribute nothing to
/// the stride.
#[derive(Clone, Debug, Default)]
pub struct PropertyTable {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    stride: usize,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, type)` declarations in header order.
    pub fn from_declarations<'a>(decls: impl IntoIterator<Item = (&'a str, ScalarType)>) -> Self {
        let mut table = Self::new();
        for (name, ty) in decls {
            table.push(name, ty);
        }
        table
    }

    /// Append a field after the existing ones.
    ///
    /// A repeated name still occupies its bytes, but lookups keep returning
    /// the first declaration.
    pub fn push(&mut self, name: impl Into<String>, ty: ScalarType) {
        let name = name.into();
        let slot = Slot {
            index: self.fields.len(),
            offset: self.stride,
            ty,
        };
        self.stride += ty.num_bytes();
        self.by_name.entry(name.clone()).or_insert(slot.index);
        self.fields.push(Field { name, slot });
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    #[inline]
    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.get(name).map(|f| f.slot)
    }

    /// Slots for all three names, or `None` if any is missing.
    pub fn slots3(&self, names: [&str; 3]) -> Option<[Slot; 3]> {
        Some([self.slot(names[0])?, self.slot(names[1])?, self.slot(names[2])?])
    }

    /// Bytes per binary vertex record.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
