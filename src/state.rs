use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::{Pos, DIRECTIONS};
use crate::grid::Grid;
use crate::moves::{Action, Plan};

/// One configuration of the search space: agent position plus box layout.
///
/// Nodes live in a `typed_arena::Arena` owned by the search engine; the
/// parent link is a plain shared reference into that arena, set once at
/// construction and never mutated, so any number of children can point at
/// the same parent. Equality and hashing cover only the agent position and
/// the box layout - cost, action and parent are deliberately excluded so
/// the frontier and explored sets deduplicate configurations, not paths.
pub struct StateNode<'a> {
    pub agent: Pos,
    /// Sorted by position; letters are uppercase.
    pub boxes: Vec<(Pos, u8)>,
    g: u32,
    action: Option<Action>,
    parent: Option<&'a StateNode<'a>>,
}

impl<'a> StateNode<'a> {
    pub fn root(agent: Pos, boxes: Vec<(Pos, u8)>) -> Self {
        Self::new(agent, boxes, 0, None, None)
    }

    fn new(
        agent: Pos,
        mut boxes: Vec<(Pos, u8)>,
        g: u32,
        action: Option<Action>,
        parent: Option<&'a StateNode<'a>>,
    ) -> Self {
        // sorted so that permutations of the same layout compare equal
        // and box lookup can binary search
        boxes.sort();
        StateNode { agent, boxes, g, action, parent }
    }

    /// Exact accumulated path cost.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    fn box_at(&self, pos: Pos) -> Option<usize> {
        self.boxes.binary_search_by_key(&pos, |&(p, _)| p).ok()
    }

    fn is_free(&self, grid: &Grid, pos: Pos) -> bool {
        !grid.is_wall(pos) && self.box_at(pos).is_none()
    }

    /// True iff every goal cell holds a box of the matching letter.
    pub fn is_goal_state(&self, grid: &Grid) -> bool {
        grid.goals().iter().all(|&(pos, goal_letter)| {
            match self.box_at(pos) {
                Some(i) => self.boxes[i].1.to_ascii_lowercase() == goal_letter,
                None => false,
            }
        })
    }

    /// All successor configurations, each at cost `g + 1`.
    ///
    /// The order is shuffled to avoid biasing the search toward a fixed
    /// direction order; the caller supplies a seeded rng so runs stay
    /// reproducible.
    pub fn expand<R: Rng>(&'a self, grid: &Grid, rng: &mut R) -> Vec<StateNode<'a>> {
        let mut successors = Vec::new();

        for &dir in &DIRECTIONS {
            let dest = self.agent + dir;
            if grid.is_wall(dest) {
                continue;
            }

            if let Some(i) = self.box_at(dest) {
                // the facing cell holds a box - the only option is pushing
                // it one cell further
                let beyond = dest + dir;
                if self.is_free(grid, beyond) {
                    let mut boxes = self.boxes.clone();
                    boxes[i].0 = beyond;
                    successors.push(self.child(dest, boxes, Action::Push(dir)));
                }
            } else {
                successors.push(self.child(dest, self.boxes.clone(), Action::Move(dir)));

                // a box behind the agent can be pulled into the vacated cell
                if let Some(i) = self.box_at(self.agent + dir.opposite()) {
                    let mut boxes = self.boxes.clone();
                    boxes[i].0 = self.agent;
                    successors.push(self.child(dest, boxes, Action::Pull(dir)));
                }
            }
        }

        successors.shuffle(rng);
        successors
    }

    fn child(&'a self, agent: Pos, boxes: Vec<(Pos, u8)>, action: Action) -> StateNode<'a> {
        StateNode::new(agent, boxes, self.g + 1, Some(action), Some(self))
    }

    /// The action sequence from the root to this node.
    pub fn extract_plan(&self) -> Plan {
        let mut actions = Vec::with_capacity(self.g as usize);
        let mut node = self;
        while let (Some(action), Some(parent)) = (node.action, node.parent) {
            actions.push(action);
            node = parent;
        }
        actions.reverse();
        Plan::new(actions)
    }
}

impl<'a> PartialEq for StateNode<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.agent == other.agent && self.boxes == other.boxes
    }
}

impl<'a> Eq for StateNode<'a> {}

impl<'a> Hash for StateNode<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.agent.hash(state);
        self.boxes.hash(state);
    }
}

impl<'a> Debug for StateNode<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StateNode {{ agent: {}, boxes: {:?}, g: {}, action: {:?} }}",
            self.agent,
            self.boxes
                .iter()
                .map(|&(p, l)| (p, l as char))
                .collect::<Vec<_>>(),
            self.g,
            self.action,
        )
    }
}
