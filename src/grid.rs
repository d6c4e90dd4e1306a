use std::fmt::{self, Debug, Display, Formatter};

use fnv::FnvHashMap;

use crate::data::Pos;
use crate::vec2d::Vec2d;

/// Static part of a level: wall mask and goal letters.
///
/// Built once by the parser and shared by reference for the whole search -
/// state nodes never copy any of this.
#[derive(Clone)]
pub struct Grid {
    walls: Vec2d<bool>,
    /// Lowercase goal letter per cell, 0 where there is no goal.
    goal_letters: Vec2d<u8>,
    goals: Vec<(Pos, u8)>,
}

impl Grid {
    pub fn new(walls: Vec2d<bool>, goals: Vec<(Pos, u8)>) -> Self {
        let mut goal_letters = walls.create_scratchpad(0u8);
        for &(pos, letter) in &goals {
            goal_letters[pos] = letter;
        }
        Grid { walls, goal_letters, goals }
    }

    pub fn rows(&self) -> i32 {
        self.walls.rows()
    }

    pub fn cols(&self) -> i32 {
        self.walls.cols()
    }

    /// Out-of-bounds counts as wall so callers never need a separate
    /// bounds check when stepping in a direction.
    pub fn is_wall(&self, pos: Pos) -> bool {
        !self.walls.contains(pos) || self.walls[pos]
    }

    pub fn walls(&self) -> &Vec2d<bool> {
        &self.walls
    }

    /// Lowercase goal letter at `pos`, if any.
    pub fn goal_at(&self, pos: Pos) -> Option<u8> {
        if self.goal_letters.contains(pos) && self.goal_letters[pos] != 0 {
            Some(self.goal_letters[pos])
        } else {
            None
        }
    }

    pub fn goals(&self) -> &[(Pos, u8)] {
        &self.goals
    }

    /// Renders the level in the server's text format with a configuration
    /// overlaid - used for diagnostics when an action gets rejected.
    pub fn render<'a>(&'a self, agent: Pos, boxes: &'a FnvHashMap<Pos, u8>) -> GridView<'a> {
        GridView { grid: self, agent, boxes }
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                let pos = Pos::new(r, c);
                if self.walls[pos] {
                    write!(f, "+")?;
                } else if let Some(letter) = self.goal_at(pos) {
                    write!(f, "{}", letter as char)?;
                } else {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub struct GridView<'a> {
    grid: &'a Grid,
    agent: Pos,
    boxes: &'a FnvHashMap<Pos, u8>,
}

impl<'a> Display for GridView<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for r in 0..self.grid.rows() {
            for c in 0..self.grid.cols() {
                let pos = Pos::new(r, c);
                if self.grid.walls[pos] {
                    write!(f, "+")?;
                } else if pos == self.agent {
                    write!(f, "0")?;
                } else if let Some(&letter) = self.boxes.get(&pos) {
                    write!(f, "{}", letter as char)?;
                } else if let Some(letter) = self.grid.goal_at(pos) {
                    write!(f, "{}", letter as char)?;
                } else {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> Debug for GridView<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
