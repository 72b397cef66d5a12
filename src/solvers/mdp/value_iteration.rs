use super::{MdpConfig, MdpOutcome, ValueFunction, extract_policy_path, greedy_action, greedy_policy};
use crate::error::SolveError;
use crate::maze::Maze;
use crate::solvers::{Solver, SolverEvent, StepObserver};

/// Solves the maze with value iteration.
///
/// Starting from V = 0, each synchronous sweep sets every non-terminal state to
/// the best one-step lookahead `max_a (-1 + gamma * V(s'))` computed from the
/// previous sweep's values. Stops once a sweep changes no value by `theta` or
/// more, then reads off the greedy policy.
///
/// Returns [`SolveError::NonConvergence`] if `config.max_sweeps` sweeps are not enough.
pub fn value_iteration(
    maze: &Maze,
    config: &MdpConfig,
    observer: StepObserver<'_>,
) -> Result<MdpOutcome, SolveError> {
    if maze.start() == maze.terminal() {
        observer.emit(|| SolverEvent::PathFound {
            algorithm: Solver::ValueIteration,
            path: vec![maze.start()],
        });
        return Ok(MdpOutcome::trivial(maze));
    }

    let terminal = maze.terminal();
    let mut values = ValueFunction::new(maze.rows(), maze.cols(), 0.0);
    let mut sweeps = 0;
    let mut performed = 0;

    loop {
        if performed >= config.max_sweeps {
            tracing::debug!("[value] gave up after {} sweeps", performed);
            return Err(SolveError::NonConvergence {
                algorithm: Solver::ValueIteration,
                sweeps: performed,
            });
        }

        let mut next_values = values.clone();
        let mut delta = 0.0f64;
        for state in maze.states().filter(|&s| s != terminal) {
            // States without any legal move keep their value
            let Some((_, best)) = greedy_action(maze, &values, state, config.gamma) else {
                continue;
            };
            delta = delta.max((best - values[state]).abs());
            next_values[state] = best;
        }
        values = next_values;
        performed += 1;

        tracing::trace!("[value] sweep {} delta {}", performed, delta);
        observer.emit(|| SolverEvent::Sweep {
            algorithm: Solver::ValueIteration,
            sweep: performed,
            delta,
            values: values.as_slice().to_vec(),
        });

        if delta < config.theta {
            break;
        }
        sweeps += 1;
    }

    let policy = greedy_policy(maze, &values, config.gamma);
    let path = extract_policy_path(maze, &policy)?;
    tracing::debug!(
        "[value] converged after {} sweeps: path length {}",
        sweeps,
        path.len()
    );
    observer.emit(|| SolverEvent::PathFound {
        algorithm: Solver::ValueIteration,
        path: path.clone(),
    });

    Ok(MdpOutcome {
        values,
        policy,
        path,
        sweeps,
        improvements: 0,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::generators::generate_seeded;
    use crate::maze::Action;
    use crate::solvers::mdp::tests::corridor;

    #[test]
    fn test_corridor_converges_in_four_sweeps() {
        let maze = corridor(5);
        let outcome = value_iteration(&maze, &MdpConfig::default(), StepObserver::none()).unwrap();
        assert_eq!(outcome.sweeps, 4);

        let expected = [-3.439, -2.71, -1.9, -1.0, 0.0];
        for (col, want) in expected.into_iter().enumerate() {
            assert!(
                (outcome.values[(0, col)] - want).abs() < 1e-9,
                "V(0,{}) = {}",
                col,
                outcome.values[(0, col)]
            );
        }
        assert_eq!(outcome.path, vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        assert!(
            (0..4).all(|c| outcome.policy[(0, c)] == Some(Action::Right)),
            "policy should always move toward the terminal"
        );
        assert_eq!(outcome.policy[(0, 4)], None);
    }

    #[test]
    fn test_corridor_values_approach_step_count_without_discounting() {
        // With gamma close to 1 the values approach minus the number of steps to go
        let config = MdpConfig {
            gamma: 1.0 - 1e-12,
            ..MdpConfig::default()
        };
        let outcome = value_iteration(&corridor(5), &config, StepObserver::none()).unwrap();
        for col in 0..5 {
            let steps_to_go = (4 - col) as f64;
            assert!((outcome.values[(0, col)] + steps_to_go).abs() < 1e-6);
        }
    }

    #[test]
    fn test_values_never_increase_and_stay_non_positive() {
        let maze = generate_seeded(5, 5, Some(9)).unwrap();
        let (tx, rx) = mpsc::channel();
        value_iteration(&maze, &MdpConfig::default(), StepObserver::new(&tx)).unwrap();
        drop(tx);

        let snapshots = rx
            .into_iter()
            .filter_map(|event| match event {
                SolverEvent::Sweep { values, .. } => Some(values),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(!snapshots.is_empty());

        let mut previous = vec![0.0; maze.len()];
        for values in snapshots {
            assert!(values.iter().all(|&v| v <= 0.0));
            assert!(previous.iter().zip(&values).all(|(&before, &after)| after <= before));
            previous = values;
        }
    }

    #[test]
    fn test_sweep_ceiling() {
        let config = MdpConfig {
            max_sweeps: 2,
            ..MdpConfig::default()
        };
        assert_eq!(
            value_iteration(&corridor(5), &config, StepObserver::none()),
            Err(SolveError::NonConvergence {
                algorithm: Solver::ValueIteration,
                sweeps: 2
            })
        );
    }

    #[test]
    fn test_terminal_value_stays_zero() {
        let maze = generate_seeded(4, 6, Some(1)).unwrap();
        let outcome = value_iteration(&maze, &MdpConfig::default(), StepObserver::none()).unwrap();
        assert_eq!(outcome.values[maze.terminal()], 0.0);
        assert_eq!(outcome.improvements, 0);
    }
}
