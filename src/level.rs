use std::fmt::{self, Debug, Display, Formatter};

use fnv::FnvHashMap;

use crate::data::Pos;
use crate::grid::Grid;

/// A parsed level: the static grid plus the starting configuration.
#[derive(Clone)]
pub struct Level {
    pub grid: Grid,
    pub agent: Pos,
    /// Uppercase box letters with their starting cells.
    pub boxes: Vec<(Pos, u8)>,
}

impl Level {
    pub fn new(grid: Grid, agent: Pos, boxes: Vec<(Pos, u8)>) -> Self {
        Level { grid, agent, boxes }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let boxes: FnvHashMap<Pos, u8> = self.boxes.iter().cloned().collect();
        write!(f, "{}", self.grid.render(self.agent, &boxes))
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_level() {
        let text = "\
++++++
+0A a+
+ B  +
+   b+
++++++
";
        let level: Level = text.parse().unwrap();
        assert_eq!(level.to_string(), text);
        assert_eq!(format!("{:?}", level), text);
    }
}
