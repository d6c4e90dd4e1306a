use std::collections::VecDeque;
use std::fmt::{self, Debug, Display, Formatter};

use log::warn;

use crate::data::{Pos, DIRECTIONS};
use crate::grid::Grid;
use crate::state::StateNode;
use crate::vec2d::Vec2d;

/// Matching passes per letter before the remaining unmatched goals are
/// dropped from the estimate - guards against cyclic non-convergence.
const MAX_MATCHING_PASSES: u32 = 100;

pub const DEFAULT_WEIGHT: i32 = 5;

/// Estimates the remaining cost of a configuration.
///
/// Both variants are knowingly inadmissible (greedy matching, one box per
/// goal) - they buy speed and decent solutions, not optimality.
pub struct Heuristic {
    /// Goal cells partitioned by their lowercase letter, letters ascending,
    /// positions ascending. The fixed order makes tie-breaking
    /// deterministic: among equidistant candidates the smallest position
    /// wins.
    goals_by_letter: Vec<(u8, Vec<Pos>)>,
    estimate: Estimate,
}

enum Estimate {
    /// Mutual-nearest goal/box matching over Manhattan distances.
    Matching,
    /// True shortest-path distances respecting walls, one precomputed map
    /// per goal.
    FloodFill(Vec<(u8, Vec2d<u16>)>),
}

impl Heuristic {
    pub fn matching(grid: &Grid) -> Self {
        Heuristic {
            goals_by_letter: partition_goals(grid),
            estimate: Estimate::Matching,
        }
    }

    /// Precomputes one flood-fill distance map per goal. More expensive up
    /// front (one BFS over the grid per goal) but never underestimates
    /// distance around obstacles.
    pub fn flood_fill(grid: &Grid) -> Self {
        let maps = grid
            .goals()
            .iter()
            .map(|&(pos, letter)| (letter, flood_fill(grid, pos)))
            .collect();
        Heuristic {
            goals_by_letter: partition_goals(grid),
            estimate: Estimate::FloodFill(maps),
        }
    }

    /// Estimated remaining cost; exactly 0 on goal states.
    pub fn h(&self, node: &StateNode<'_>) -> i32 {
        match self.estimate {
            Estimate::Matching => self.matching_estimate(node),
            Estimate::FloodFill(ref maps) => flood_fill_estimate(maps, node),
        }
    }

    /// For every goal, pair it with the nearest box of its letter, but only
    /// if the goal is in turn among that box's nearest goals; a confirmed
    /// pair is final for this evaluation, so no box satisfies two goals.
    /// Unconfirmed goals are retried in further passes until the pass cap
    /// hits or a pass makes no progress, at which point the leftovers are
    /// dropped from the estimate.
    fn matching_estimate(&self, node: &StateNode<'_>) -> i32 {
        let mut h = 0;

        for (letter, all_goals) in &self.goals_by_letter {
            // node.boxes is sorted by position, so this stays ascending
            let mut boxes: Vec<Pos> = node
                .boxes
                .iter()
                .filter(|&&(_, box_letter)| box_letter.to_ascii_lowercase() == *letter)
                .map(|&(pos, _)| pos)
                .collect();
            let mut goals = all_goals.clone();

            let mut passes = 0;
            while !goals.is_empty() {
                let mut unsolved = Vec::new();
                for i in 0..goals.len() {
                    let goal = goals[i];
                    let confirmed = closest(goal, &boxes)
                        .into_iter()
                        .find(|&box_pos| closest(box_pos, &goals).contains(&goal));
                    match confirmed {
                        Some(box_pos) => {
                            h += goal.dist(box_pos);
                            boxes.retain(|&b| b != box_pos);
                        }
                        None => unsolved.push(goal),
                    }
                }

                passes += 1;
                let stuck = unsolved.len() == goals.len();
                goals = unsolved;
                if goals.is_empty() {
                    break;
                }
                if stuck || passes == MAX_MATCHING_PASSES {
                    warn!(
                        "goal matching did not converge, dropping {} goal(s) for '{}'",
                        goals.len(),
                        *letter as char,
                    );
                    break;
                }
            }
        }

        h
    }
}

fn partition_goals(grid: &Grid) -> Vec<(u8, Vec<Pos>)> {
    let mut partitions: Vec<(u8, Vec<Pos>)> = Vec::new();
    for &(pos, letter) in grid.goals() {
        match partitions.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, positions)) => positions.push(pos),
            None => partitions.push((letter, vec![pos])),
        }
    }
    partitions.sort_by_key(|&(letter, _)| letter);
    for (_, positions) in &mut partitions {
        positions.sort();
    }
    partitions
}

/// All candidates at minimum Manhattan distance from `from`, in the order
/// they appear in `candidates` (ascending positions).
fn closest(from: Pos, candidates: &[Pos]) -> Vec<Pos> {
    let mut best = Vec::new();
    let mut best_dist = i32::max_value();
    for &candidate in candidates {
        let dist = from.dist(candidate);
        if dist < best_dist {
            best_dist = dist;
            best.clear();
            best.push(candidate);
        } else if dist == best_dist {
            best.push(candidate);
        }
    }
    best
}

/// Sum over boxes of the smallest map value among that letter's goals - a
/// box already on a matching goal contributes 0. Boxes whose letter has no
/// goal contribute nothing; a box that can't reach any of its goals
/// contributes the unreachable sentinel, which dwarfs every real distance.
fn flood_fill_estimate(maps: &[(u8, Vec2d<u16>)], node: &StateNode<'_>) -> i32 {
    let mut h = 0;

    for &(box_pos, box_letter) in &node.boxes {
        let letter = box_letter.to_ascii_lowercase();
        let min = maps
            .iter()
            .filter(|&&(goal_letter, _)| goal_letter == letter)
            .map(|(_, map)| map[box_pos])
            .min();
        if let Some(min) = min {
            h += i32::from(min);
        }
    }

    h
}

/// Unweighted breadth-first distance propagation from one cell, blocked by
/// walls. Explicit work queue - grids can be larger than the stack is deep.
fn flood_fill(grid: &Grid, from: Pos) -> Vec2d<u16> {
    let mut dist = grid.walls().create_scratchpad(u16::max_value());
    let mut queue = VecDeque::new();

    dist[from] = 0;
    queue.push_back(from);
    while let Some(pos) = queue.pop_front() {
        for &dir in &DIRECTIONS {
            let next = pos + dir;
            if !grid.is_wall(next) && dist[next] == u16::max_value() {
                dist[next] = dist[pos] + 1;
                queue.push_back(next);
            }
        }
    }

    dist
}

/// The evaluation-function family for best-first search. One tag per
/// formula instead of a type per formula - they only differ in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    AStar,
    WeightedAStar(i32),
    Greedy,
}

impl Evaluator {
    pub fn f(self, g: u32, h: i32) -> i32 {
        match self {
            Evaluator::AStar => g as i32 + h,
            Evaluator::WeightedAStar(weight) => g as i32 + weight * h,
            Evaluator::Greedy => h,
        }
    }
}

impl Display for Evaluator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Evaluator::AStar => write!(f, "A* evaluation"),
            Evaluator::WeightedAStar(weight) => write!(f, "WA*({}) evaluation", weight),
            Evaluator::Greedy => write!(f, "Greedy evaluation"),
        }
    }
}

impl Debug for Heuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let estimate = match self.estimate {
            Estimate::Matching => "matching",
            Estimate::FloodFill(_) => "flood-fill",
        };
        write!(f, "Heuristic {{ estimate: {} }}", estimate)
    }
}
