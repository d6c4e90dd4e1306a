use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::fmt::{self, Debug, Display, Formatter};
use std::time::{Duration, Instant};

use fnv::FnvHashSet;
use separator::Separatable;

use crate::config::Method;
use crate::grid::Grid;
use crate::heuristic::{Evaluator, Heuristic};
use crate::state::StateNode;

/// Builds the strategy for a selector. Best-first variants precompute
/// their heuristic from the grid; `flood_fill` switches them from
/// Manhattan matching to the wall-aware distance maps.
pub fn strategy_for<'a>(
    method: Method,
    grid: &Grid,
    flood_fill: bool,
    weight: i32,
) -> Strategy<'a> {
    let heuristic = || {
        if flood_fill {
            Heuristic::flood_fill(grid)
        } else {
            Heuristic::matching(grid)
        }
    };
    match method {
        Method::Bfs => Strategy::bfs(),
        Method::Dfs => Strategy::dfs(),
        Method::AStar => Strategy::best_first(heuristic(), Evaluator::AStar),
        Method::WeightedAStar => {
            Strategy::best_first(heuristic(), Evaluator::WeightedAStar(weight))
        }
        Method::Greedy => Strategy::best_first(heuristic(), Evaluator::Greedy),
    }
}

/// Drives the search: owns the frontier in one of three disciplines and
/// the explored set.
///
/// The strategy does not deduplicate on its own - the engine checks
/// `in_frontier` / `is_explored` before every `add_to_frontier`, exactly
/// once per generated node. Membership is keyed by `StateNode` equality
/// (agent position + box layout, nothing else).
pub struct Strategy<'a> {
    frontier: Frontier<'a>,
    frontier_set: FnvHashSet<&'a StateNode<'a>>,
    explored: FnvHashSet<&'a StateNode<'a>>,
    generated: u64,
    started: Instant,
}

enum Frontier<'a> {
    Fifo(VecDeque<&'a StateNode<'a>>),
    Lifo(Vec<&'a StateNode<'a>>),
    Best {
        heap: BinaryHeap<Reverse<Prioritized<'a>>>,
        heuristic: Heuristic,
        evaluator: Evaluator,
    },
}

/// Heap entry: `f` first, then a monotonic sequence number so that ties in
/// `f` pop in insertion order.
struct Prioritized<'a> {
    f: i32,
    seq: u64,
    node: &'a StateNode<'a>,
}

impl<'a> PartialEq for Prioritized<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl<'a> Eq for Prioritized<'a> {}

impl<'a> PartialOrd for Prioritized<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Prioritized<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f, self.seq).cmp(&(other.f, other.seq))
    }
}

impl<'a> Strategy<'a> {
    pub fn bfs() -> Self {
        Self::with_frontier(Frontier::Fifo(VecDeque::new()))
    }

    pub fn dfs() -> Self {
        Self::with_frontier(Frontier::Lifo(Vec::new()))
    }

    pub fn best_first(heuristic: Heuristic, evaluator: Evaluator) -> Self {
        Self::with_frontier(Frontier::Best {
            heap: BinaryHeap::new(),
            heuristic,
            evaluator,
        })
    }

    fn with_frontier(frontier: Frontier<'a>) -> Self {
        Strategy {
            frontier,
            frontier_set: FnvHashSet::default(),
            explored: FnvHashSet::default(),
            generated: 0,
            started: Instant::now(),
        }
    }

    pub fn add_to_frontier(&mut self, node: &'a StateNode<'a>) {
        let seq = self.generated;
        self.generated += 1;
        self.frontier_set.insert(node);
        match self.frontier {
            Frontier::Fifo(ref mut queue) => queue.push_back(node),
            Frontier::Lifo(ref mut stack) => stack.push(node),
            Frontier::Best {
                ref mut heap,
                ref heuristic,
                evaluator,
            } => {
                let f = evaluator.f(node.g(), heuristic.h(node));
                heap.push(Reverse(Prioritized { f, seq, node }));
            }
        }
    }

    /// Removes and returns the next leaf per the discipline, `None` when
    /// the frontier is empty.
    pub fn get_and_remove_leaf(&mut self) -> Option<&'a StateNode<'a>> {
        let node = match self.frontier {
            Frontier::Fifo(ref mut queue) => queue.pop_front(),
            Frontier::Lifo(ref mut stack) => stack.pop(),
            Frontier::Best { ref mut heap, .. } => heap.pop().map(|Reverse(p)| p.node),
        }?;
        self.frontier_set.remove(node);
        Some(node)
    }

    pub fn frontier_is_empty(&self) -> bool {
        self.frontier_set.is_empty()
    }

    pub fn in_frontier(&self, node: &StateNode<'a>) -> bool {
        self.frontier_set.contains(node)
    }

    pub fn is_explored(&self, node: &StateNode<'a>) -> bool {
        self.explored.contains(node)
    }

    pub fn add_to_explored(&mut self, node: &'a StateNode<'a>) {
        self.explored.insert(node);
    }

    /// Total nodes ever added to the frontier, including the root.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Advisory counters for diagnostics - no effect on the search.
    pub fn search_status(&self) -> Status {
        Status {
            frontier: self.frontier_set.len(),
            explored: self.explored.len(),
            generated: self.generated,
            elapsed: self.started.elapsed(),
        }
    }
}

impl<'a> Display for Strategy<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.frontier {
            Frontier::Fifo(_) => write!(f, "Breadth-first search"),
            Frontier::Lifo(_) => write!(f, "Depth-first search"),
            Frontier::Best { evaluator, .. } => {
                write!(f, "Best-first search using {}", evaluator)
            }
        }
    }
}

impl<'a> Debug for Strategy<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self, self.search_status())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub frontier: usize,
    pub explored: usize,
    pub generated: u64,
    pub elapsed: Duration,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#Explored: {}, #Frontier: {}, #Generated: {}, Time: {:.2} s",
            self.explored.separated_string(),
            self.frontier.separated_string(),
            self.generated.separated_string(),
            self.elapsed.as_secs_f64(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Pos;
    use crate::level::Level;

    fn nodes() -> Vec<StateNode<'static>> {
        (0..4)
            .map(|i| StateNode::root(Pos::new(1, 1 + i), vec![]))
            .collect()
    }

    #[test]
    fn fifo_pops_oldest_first() {
        let nodes = nodes();
        let mut strategy = Strategy::bfs();
        for node in &nodes {
            strategy.add_to_frontier(node);
        }
        for node in &nodes {
            assert_eq!(strategy.get_and_remove_leaf().unwrap(), node);
        }
        assert!(strategy.frontier_is_empty());
        assert_eq!(strategy.get_and_remove_leaf(), None);
    }

    #[test]
    fn lifo_pops_newest_first() {
        let nodes = nodes();
        let mut strategy = Strategy::dfs();
        for node in &nodes {
            strategy.add_to_frontier(node);
        }
        for node in nodes.iter().rev() {
            assert_eq!(strategy.get_and_remove_leaf().unwrap(), node);
        }
        assert!(strategy.frontier_is_empty());
    }

    #[test]
    fn best_first_pops_lowest_f() {
        let level: Level = "\
+++++++
+0A  a+
+++++++".parse().unwrap();
        let goal = Pos::new(1, 5);
        // boxes at distance 3, 1 and 2 from the goal
        let far = StateNode::root(Pos::new(1, 1), vec![(Pos::new(1, 2), b'A')]);
        let near = StateNode::root(Pos::new(1, 3), vec![(Pos::new(1, 4), b'A')]);
        let mid = StateNode::root(Pos::new(1, 2), vec![(Pos::new(1, 3), b'A')]);
        assert_eq!(goal.dist(far.boxes[0].0), 3);

        let mut strategy =
            Strategy::best_first(Heuristic::matching(&level.grid), Evaluator::Greedy);
        strategy.add_to_frontier(&far);
        strategy.add_to_frontier(&near);
        strategy.add_to_frontier(&mid);
        assert_eq!(strategy.get_and_remove_leaf().unwrap(), &near);
        assert_eq!(strategy.get_and_remove_leaf().unwrap(), &mid);
        assert_eq!(strategy.get_and_remove_leaf().unwrap(), &far);
    }

    #[test]
    fn best_first_breaks_ties_by_insertion_order() {
        let level: Level = "\
+++++++
+0A  a+
+++++++".parse().unwrap();
        // same box layout distance, different agent cells
        let first = StateNode::root(Pos::new(1, 1), vec![(Pos::new(1, 2), b'A')]);
        let second = StateNode::root(Pos::new(1, 3), vec![(Pos::new(1, 2), b'A')]);

        let mut strategy =
            Strategy::best_first(Heuristic::matching(&level.grid), Evaluator::Greedy);
        strategy.add_to_frontier(&first);
        strategy.add_to_frontier(&second);
        assert_eq!(strategy.get_and_remove_leaf().unwrap(), &first);
        assert_eq!(strategy.get_and_remove_leaf().unwrap(), &second);
    }

    #[test]
    fn membership_and_counters() {
        let nodes = nodes();
        let mut strategy = Strategy::bfs();
        strategy.add_to_frontier(&nodes[0]);
        strategy.add_to_frontier(&nodes[1]);
        assert!(strategy.in_frontier(&nodes[0]));
        assert!(!strategy.in_frontier(&nodes[2]));

        let leaf = strategy.get_and_remove_leaf().unwrap();
        assert!(!strategy.in_frontier(leaf));
        strategy.add_to_explored(leaf);
        assert!(strategy.is_explored(leaf));
        assert!(!strategy.is_explored(&nodes[1]));

        let status = strategy.search_status();
        assert_eq!(status.generated, 2);
        assert_eq!(status.frontier, 1);
        assert_eq!(status.explored, 1);
    }

    #[test]
    fn membership_uses_state_equality_not_identity() {
        let node = StateNode::root(Pos::new(1, 1), vec![(Pos::new(2, 2), b'A')]);
        let twin = StateNode::root(Pos::new(1, 1), vec![(Pos::new(2, 2), b'A')]);
        let mut strategy = Strategy::bfs();
        strategy.add_to_frontier(&node);
        assert!(strategy.in_frontier(&twin));
    }
}
