use std::fmt::{Debug, Formatter};

use tracing::debug;

/// One unit of linear memory growth.
pub type Page = Box<[u8; Memory::PAGE_SIZE]>;

#[inline]
fn make_page() -> Page { Box::new([0; Memory::PAGE_SIZE]) }

/// Linear memory made of fixed-size pages, bounded by a page ceiling.
///
/// Pages are only ever appended. Their contents are zero-filled and not yet addressable by any
/// instruction.
pub struct Memory {
    pages: Vec<Page>,
    maximum: usize,
}

impl Memory {
    pub const PAGE_SIZE: usize = 10 * 1024;

    /// A ceiling below the initial size is raised to the initial size.
    pub fn new(initial: usize, maximum: usize) -> Self {
        let pages = (0..initial).map(|_| make_page()).collect();
        Self { pages, maximum: maximum.max(initial) }
    }

    pub fn size(&self) -> usize { self.pages.len() }
    pub fn max(&self) -> usize { self.maximum }
    pub fn byte_len(&self) -> usize { self.pages.len() * Self::PAGE_SIZE }
    pub fn pages(&self) -> &[Page] { &self.pages }

    /// Appends one page if below the ceiling. Growing at the ceiling is not an error, it just
    /// reports `false`.
    pub fn grow(&mut self) -> bool {
        if self.pages.len() >= self.maximum {
            debug!(pages = self.pages.len(), max = self.maximum, "grow ignored at page ceiling");
            return false;
        }
        self.pages.push(make_page());
        debug!(pages = self.pages.len(), max = self.maximum, "memory grown");
        true
    }
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("pages", &self.pages.len()).field("max", &self.maximum).finish()
    }
}
