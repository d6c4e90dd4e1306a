use std::fmt::{self, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::Pos;

/// Flat row-major 2d array indexed by `Pos`.
///
/// Indexing panics out of bounds - callers that might step off the board
/// check `contains` first (the grid treats out-of-bounds as wall).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vec2d<T> {
    data: Vec<T>,
    rows: i32,
    cols: i32,
}

impl<T: Copy> Vec2d<T> {
    pub fn new(rows: i32, cols: i32, default: T) -> Self {
        assert!(rows > 0 && cols > 0);
        Vec2d {
            data: vec![default; rows as usize * cols as usize],
            rows,
            cols,
        }
    }

    /// A same-sized grid filled with `default` - for visited flags,
    /// distance maps and similar per-search scratch data.
    pub fn create_scratchpad<U: Copy>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T> Vec2d<T> {
    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.r >= 0 && pos.c >= 0 && pos.r < self.rows && pos.c < self.cols
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &T {
        assert!(self.contains(index), "position {} out of bounds", index);
        &self.data[index.r as usize * self.cols as usize + index.c as usize]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut T {
        assert!(self.contains(index), "position {} out of bounds", index);
        &mut self.data[index.r as usize * self.cols as usize + index.c as usize]
    }
}

impl Display for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols as usize) {
            for &cell in row {
                write!(f, "{}", if cell { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
