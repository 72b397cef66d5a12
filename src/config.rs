use crate::error::MazeError;
use crate::solvers::MdpConfig;

/// Everything needed to build a maze and run the planners on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    /// Seed for maze generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub mdp: MdpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            seed: None,
            // The horizon has to cover every cell of a 20x20 maze
            mdp: MdpConfig::long_horizon(),
        }
    }
}

impl Config {
    /// Checks dimensions and MDP parameters, returning the first problem found.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MazeError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.mdp.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::generate_seeded;
    use crate::solvers::{Solver, StepObserver, solve_maze};

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!((config.rows, config.cols), (20, 20));
        assert!(config.validate().is_ok());
        assert!(config.mdp.horizon() >= config.rows * config.cols);
    }

    #[test]
    fn test_default_planners_solve_default_size() {
        let config = Config::default();
        for seed in 0..3 {
            let maze = generate_seeded(config.rows, config.cols, Some(seed)).unwrap();
            let bfs = solve_maze(&maze, Solver::Bfs, &config.mdp, StepObserver::none()).unwrap();
            for solver in [Solver::PolicyIteration, Solver::ValueIteration] {
                let solution = solve_maze(&maze, solver, &config.mdp, StepObserver::none())
                    .unwrap_or_else(|err| panic!("{} seed {}: {}", solver, seed, err));
                assert_eq!(solution.path, bfs.path, "{} seed {}", solver, seed);
            }
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = Config {
            rows: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(MazeError::InvalidDimensions { rows: 0, cols: 20 })
        );

        let config = Config {
            mdp: MdpConfig {
                gamma: 0.0,
                ..MdpConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(MazeError::InvalidDiscount(0.0)));
    }
}
