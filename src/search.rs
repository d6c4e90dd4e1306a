use std::fmt::{self, Display, Formatter};
use std::mem;

use log::{debug, error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use typed_arena::Arena;

use crate::data::Pos;
use crate::level::Level;
use crate::moves::Plan;
use crate::state::StateNode;
use crate::strategy::{Status, Strategy};

/// How often the search loop reports progress.
const STATUS_INTERVAL: u64 = 1000;

/// Fixed seed for shuffling successors - the original client seeded its
/// shuffle the same way so runs are comparable.
const SHUFFLE_SEED: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminated {
    /// A goal configuration was reached.
    Solved,
    /// The frontier ran dry - the level has no solution.
    Exhausted,
    /// The state budget ran out before a goal was found. Reported as a
    /// failure outcome instead of letting allocation kill the process.
    OutOfMemory,
}

#[derive(Debug)]
pub struct Outcome {
    pub terminated: Terminated,
    pub plan: Option<Plan>,
    pub status: Status,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.plan {
            Some(ref plan) => writeln!(f, "Found solution of length {}", plan.len())?,
            None => writeln!(f, "Unable to solve level.")?,
        }
        write!(f, "{}", self.status)
    }
}

/// The only built-in bound on a search. Translated to a node budget up
/// front; exceeding it ends the search with `Terminated::OutOfMemory`.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_bytes: 2048 * 1024 * 1024 }
    }
}

impl Limits {
    pub fn from_megabytes(megabytes: u64) -> Self {
        Limits { max_bytes: megabytes * 1024 * 1024 }
    }

    fn max_states(self, level: &Level) -> u64 {
        self.max_bytes / node_footprint(level)
    }
}

/// Rough per-node heap cost: the node itself, its box vector and its slots
/// in the frontier and the two hash sets.
fn node_footprint(level: &Level) -> u64 {
    let boxes = level.boxes.len() * mem::size_of::<(Pos, u8)>();
    let sets = 3 * mem::size_of::<usize>() * 2;
    (mem::size_of::<StateNode<'static>>() + boxes + sets) as u64
}

/// The driving loop: pull a leaf per the strategy's discipline, test for
/// goal, expand successors, feed the new ones back. Runs to completion -
/// solved, exhausted or out of budget.
pub fn search<'a>(
    arena: &'a Arena<StateNode<'a>>,
    level: &Level,
    strategy: &mut Strategy<'a>,
    limits: Limits,
) -> Outcome {
    let grid = &level.grid;
    let max_states = limits.max_states(level);
    let mut rng = ChaCha8Rng::seed_from_u64(SHUFFLE_SEED);

    info!("Search starting with strategy {}.", strategy);
    let root = &*arena.alloc(StateNode::root(level.agent, level.boxes.clone()));
    strategy.add_to_frontier(root);

    let mut iterations: u64 = 0;
    loop {
        iterations += 1;
        if iterations % STATUS_INTERVAL == 0 {
            info!("{}", strategy.search_status());
        }

        let leaf = match strategy.get_and_remove_leaf() {
            Some(leaf) => leaf,
            None => {
                return Outcome {
                    terminated: Terminated::Exhausted,
                    plan: None,
                    status: strategy.search_status(),
                };
            }
        };

        if leaf.is_goal_state(grid) {
            debug!("Goal found at depth {}, backtracking plan", leaf.g());
            return Outcome {
                terminated: Terminated::Solved,
                plan: Some(leaf.extract_plan()),
                status: strategy.search_status(),
            };
        }

        strategy.add_to_explored(leaf);
        for successor in leaf.expand(grid, &mut rng) {
            if !strategy.is_explored(&successor) && !strategy.in_frontier(&successor) {
                strategy.add_to_frontier(arena.alloc(successor));
            }
        }

        if strategy.generated() > max_states {
            error!("Maximum memory usage exceeded.");
            return Outcome {
                terminated: Terminated::OutOfMemory,
                plan: None,
                status: strategy.search_status(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use fnv::FnvHashMap;

    use super::*;
    use crate::heuristic::{Evaluator, Heuristic, DEFAULT_WEIGHT};

    fn run_bfs(text: &str) -> Outcome {
        let level: Level = text.parse().unwrap();
        let arena = Arena::new();
        let mut strategy = Strategy::bfs();
        search(&arena, &level, &mut strategy, Limits::default())
    }

    #[test]
    fn bfs_finds_shortest_plan() {
        // two pushes east, nothing shorter exists
        let outcome = run_bfs(
            "\
++++++
+0A a+
++++++",
        );
        assert_eq!(outcome.terminated, Terminated::Solved);
        assert_eq!(outcome.plan.unwrap().len(), 2);
    }

    #[test]
    fn solved_level_yields_empty_plan() {
        // no boxes, no goals - the root already satisfies every goal
        let outcome = run_bfs(
            "\
+++
+0+
+++",
        );
        assert_eq!(outcome.terminated, Terminated::Solved);
        assert!(outcome.plan.unwrap().is_empty());
    }

    #[test]
    fn sealed_goal_exhausts_frontier() {
        // the goal chamber is walled off - finite reachable state space,
        // no solution
        let outcome = run_bfs(
            "\
++++++
+0A+a+
++++++",
        );
        assert_eq!(outcome.terminated, Terminated::Exhausted);
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn all_strategies_solve_and_replay() {
        let text = "\
+++++++
+0A  a+
+++++++";
        let level: Level = text.parse().unwrap();
        for selector in 0..5 {
            let arena = Arena::new();
            let mut strategy = match selector {
                0 => Strategy::bfs(),
                1 => Strategy::dfs(),
                2 => Strategy::best_first(Heuristic::matching(&level.grid), Evaluator::AStar),
                3 => Strategy::best_first(
                    Heuristic::matching(&level.grid),
                    Evaluator::WeightedAStar(DEFAULT_WEIGHT),
                ),
                _ => Strategy::best_first(Heuristic::flood_fill(&level.grid), Evaluator::Greedy),
            };
            let outcome = search(&arena, &level, &mut strategy, Limits::default());
            assert_eq!(outcome.terminated, Terminated::Solved);

            // replaying the plan from the start reaches a goal configuration
            let plan = outcome.plan.unwrap();
            let mut agent = level.agent;
            let mut boxes: FnvHashMap<Pos, u8> = level.boxes.iter().cloned().collect();
            for &action in &plan {
                agent = action.apply(agent, &mut boxes).unwrap();
            }
            for &(goal_pos, goal_letter) in level.grid.goals() {
                assert_eq!(
                    boxes.get(&goal_pos).map(|l| l.to_ascii_lowercase()),
                    Some(goal_letter)
                );
            }
        }
    }

    #[test]
    fn tiny_budget_reports_out_of_memory() {
        let level: Level = "\
+++++++
+0A  a+
+++++++".parse().unwrap();
        let arena = Arena::new();
        let mut strategy = Strategy::bfs();
        let outcome = search(&arena, &level, &mut strategy, Limits { max_bytes: 1 });
        assert_eq!(outcome.terminated, Terminated::OutOfMemory);
        assert!(outcome.plan.is_none());
    }
}
