use std::fmt::{self, Display, Formatter};

use fnv::FnvHashMap;

use crate::data::{Dir, Pos};

/// A single step of the agent. Push and pull only carry the direction the
/// agent walks in - which box moves is implicit in the configuration the
/// action is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Dir),
    Push(Dir),
    Pull(Dir),
}

impl Action {
    /// Applies the action to a configuration, returning the agent's new
    /// position and updating `boxes` in place. `None` means the action is
    /// not applicable (no box where it expects one) - that never happens
    /// for plans produced by the search.
    pub fn apply(self, agent: Pos, boxes: &mut FnvHashMap<Pos, u8>) -> Option<Pos> {
        match self {
            Action::Move(dir) => Some(agent + dir),
            Action::Push(dir) => {
                let box_pos = agent + dir;
                let letter = boxes.remove(&box_pos)?;
                boxes.insert(box_pos + dir, letter);
                Some(box_pos)
            }
            Action::Pull(dir) => {
                let box_pos = agent + dir.opposite();
                let letter = boxes.remove(&box_pos)?;
                boxes.insert(agent, letter);
                Some(agent + dir)
            }
        }
    }
}

/// One token per action, e.g. `Move(N)` - the wire format the server acks
/// line by line.
impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Action::Move(dir) => write!(f, "Move({})", dir),
            Action::Push(dir) => write!(f, "Push({})", dir),
            Action::Pull(dir) => write!(f, "Pull({})", dir),
        }
    }
}

/// Root-to-goal action sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan(Vec<Action>);

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        Plan(actions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_cnt(&self) -> usize {
        self.0
            .iter()
            .filter(|a| matches!(a, Action::Push(_)))
            .count()
    }

    pub fn pull_cnt(&self) -> usize {
        self.0
            .iter()
            .filter(|a| matches!(a, Action::Pull(_)))
            .count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }
}

impl IntoIterator for Plan {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for action in &self.0 {
            writeln!(f, "{}", action)?;
        }
        Ok(())
    }
}
