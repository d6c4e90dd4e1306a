use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::Pos;
use crate::grid::Grid;
use crate::level::Level;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Empty,
    InvalidCell(usize, usize, char),
    MultipleAgents,
    NoAgent,
    Colors,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Empty => write!(f, "Empty level"),
            ParserErr::InvalidCell(r, c, chr) => {
                write!(f, "Invalid character {:?} at [{}, {}]", chr, r, c)
            }
            ParserErr::MultipleAgents => write!(f, "More than one agent"),
            ParserErr::NoAgent => write!(f, "No agent"),
            ParserErr::Colors => write!(f, "Color declarations are not supported"),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses the server's level format: `+` wall, digit agent, uppercase
/// letter box, lowercase letter goal, space free. Parsing stops at the
/// first blank line (the server terminates the level with one). Short
/// lines are padded with free cells.
pub fn parse(level: &str) -> Result<Level, ParserErr> {
    let level = level.trim_matches('\n');

    // a leading `color: 0,A,...` line means a multi-color level
    if let Some(first) = level.lines().next() {
        if is_color_declaration(first) {
            return Err(ParserErr::Colors);
        }
    }

    let mut rows: i32 = 0;
    let mut cols: i32 = 0;
    for line in level.lines() {
        if line.is_empty() {
            break;
        }
        rows += 1;
        cols = cols.max(line.chars().count() as i32);
    }
    if rows == 0 || cols == 0 {
        return Err(ParserErr::Empty);
    }

    let mut walls = Vec2d::new(rows, cols, false);
    let mut goals = Vec::new();
    let mut boxes = Vec::new();
    let mut agent = None;

    for (r, line) in level.lines().enumerate() {
        if line.is_empty() {
            break;
        }
        for (c, chr) in line.chars().enumerate() {
            let pos = Pos::new(r as i32, c as i32);
            match chr {
                '+' => walls[pos] = true,
                '0'..='9' => {
                    if agent.is_some() {
                        return Err(ParserErr::MultipleAgents);
                    }
                    agent = Some(pos);
                }
                'A'..='Z' => boxes.push((pos, chr as u8)),
                'a'..='z' => goals.push((pos, chr as u8)),
                ' ' => {}
                _ => return Err(ParserErr::InvalidCell(r, c, chr)),
            }
        }
    }

    let agent = agent.ok_or(ParserErr::NoAgent)?;
    Ok(Level::new(Grid::new(walls, goals), agent, boxes))
}

fn is_color_declaration(line: &str) -> bool {
    match line.find(':') {
        Some(i) => i > 0 && line[..i].chars().all(|c| c.is_ascii_lowercase()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_empty() {
        assert_eq!("".parse::<Level>().unwrap_err(), ParserErr::Empty);
    }

    #[test]
    fn fail_no_agent() {
        let level = r"
+++++
+A a+
+++++
";
        assert_eq!(level.parse::<Level>().unwrap_err(), ParserErr::NoAgent);
    }

    #[test]
    fn fail_multiple_agents() {
        let level = r"
+++++
+0 1+
+++++
";
        assert_eq!(
            level.parse::<Level>().unwrap_err(),
            ParserErr::MultipleAgents
        );
    }

    #[test]
    fn fail_invalid_cell() {
        let level = r"
+++++
+0 ?+
+++++
";
        assert_eq!(
            level.parse::<Level>().unwrap_err(),
            ParserErr::InvalidCell(1, 3, '?')
        );
    }

    #[test]
    fn fail_colors() {
        let level = "blue: 0, A\n+++++\n+0A++\n+++++";
        assert_eq!(level.parse::<Level>().unwrap_err(), ParserErr::Colors);
    }

    #[test]
    fn simplest() {
        let level = r"
+++++
+0Aa+
+++++
";
        let level: Level = level.parse().unwrap();
        assert_eq!(level.agent, Pos::new(1, 1));
        assert_eq!(level.boxes, vec![(Pos::new(1, 2), b'A')]);
        assert_eq!(level.grid.goals(), &[(Pos::new(1, 3), b'a')]);
        assert_eq!(level.grid.goal_at(Pos::new(1, 3)), Some(b'a'));
        assert_eq!(level.grid.goal_at(Pos::new(1, 2)), None);
    }

    #[test]
    fn ragged_lines_padded_with_free_cells() {
        let level = "++++\n+0A\n++++";
        let level: Level = level.parse().unwrap();
        assert_eq!(level.grid.cols(), 4);
        assert!(!level.grid.is_wall(Pos::new(1, 3)));
    }

    #[test]
    fn stops_at_blank_line() {
        let level = "+++\n+0+\n+++\n\n+++\n+1+\n+++";
        let level: Level = level.parse().unwrap();
        assert_eq!(level.grid.rows(), 3);
        assert_eq!(level.agent, Pos::new(1, 1));
    }
}
