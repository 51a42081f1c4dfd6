use crate::{Catalog, TemplateDescriptor};

/// Cursor into a non-empty catalog. `cursor < catalog.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    catalog: Catalog,
    cursor: usize,
}

impl Selection {
    /// Returns `None` for an empty catalog, which has no valid cursor.
    pub fn new(catalog: Catalog) -> Option<Self> {
        if catalog.is_empty() {
            return None;
        }
        Some(Self { catalog, cursor: 0 })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_index(&self) -> usize {
        self.catalog.len() - 1
    }

    pub fn current(&self) -> &TemplateDescriptor {
        // cursor is clamped on every write
        &self.catalog.as_slice()[self.cursor]
    }

    /// Moves the cursor to `clamp(index, 0, len - 1)` and reports whether it moved.
    pub fn set_index(&mut self, index: i64) -> bool {
        let clamped = index.clamp(0, self.last_index() as i64) as usize;
        if clamped == self.cursor {
            return false;
        }
        self.cursor = clamped;
        true
    }

    pub fn next(&mut self) -> bool {
        self.set_index(self.cursor as i64 + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.set_index(self.cursor as i64 - 1)
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor == self.last_index()
    }
}
