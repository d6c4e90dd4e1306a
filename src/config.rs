use std::fmt::{self, Display, Formatter};

/// Which discipline drives the search, as selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Bfs,
    Dfs,
    AStar,
    WeightedAStar,
    Greedy,
}

impl Method {
    /// Case-insensitive; `None` for an unrecognized selector - the caller
    /// falls back to breadth-first.
    pub fn from_selector(selector: &str) -> Option<Method> {
        match selector.to_ascii_lowercase().as_str() {
            "bfs" => Some(Method::Bfs),
            "dfs" => Some(Method::Dfs),
            "astar" => Some(Method::AStar),
            "wastar" => Some(Method::WeightedAStar),
            "greedy" => Some(Method::Greedy),
            _ => None,
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Method::Bfs => write!(f, "bfs"),
            Method::Dfs => write!(f, "dfs"),
            Method::AStar => write!(f, "astar"),
            Method::WeightedAStar => write!(f, "wastar"),
            Method::Greedy => write!(f, "greedy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trip() {
        for &method in &[
            Method::Bfs,
            Method::Dfs,
            Method::AStar,
            Method::WeightedAStar,
            Method::Greedy,
        ] {
            assert_eq!(Method::from_selector(&method.to_string()), Some(method));
        }
        assert_eq!(Method::from_selector("simulated-annealing"), None);
    }

    #[test]
    fn selector_ignores_case() {
        assert_eq!(Method::from_selector("ASTAR"), Some(Method::AStar));
        assert_eq!(Method::from_selector("Greedy"), Some(Method::Greedy));
        assert_eq!(Method::from_selector("wAsTaR"), Some(Method::WeightedAStar));
    }
}
