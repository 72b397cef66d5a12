use super::{MdpConfig, MdpOutcome, Policy, ValueFunction, extract_policy_path, greedy_action, q_value};
use crate::error::SolveError;
use crate::maze::Maze;
use crate::solvers::{Solver, SolverEvent, StepObserver};

/// Solves the maze with policy iteration.
///
/// Starts from the first legal action in every state, then alternates
/// in-place policy evaluation with greedy improvement until an improvement
/// pass leaves every action unchanged. `sweeps` in the outcome is the total
/// number of evaluation sweeps across all evaluation phases.
///
/// Returns [`SolveError::NonConvergence`] once `config.max_sweeps` evaluation
/// sweeps have been spent.
pub fn policy_iteration(
    maze: &Maze,
    config: &MdpConfig,
    observer: StepObserver<'_>,
) -> Result<MdpOutcome, SolveError> {
    if maze.start() == maze.terminal() {
        observer.emit(|| SolverEvent::PathFound {
            algorithm: Solver::PolicyIteration,
            path: vec![maze.start()],
        });
        return Ok(MdpOutcome::trivial(maze));
    }

    let terminal = maze.terminal();
    let mut policy = Policy::from_fn(maze.rows(), maze.cols(), |state| {
        if state == terminal {
            None
        } else {
            maze.legal_actions(state).next().map(|(action, _)| action)
        }
    });
    let mut values = ValueFunction::new(maze.rows(), maze.cols(), 0.0);

    let mut sweeps = 0;
    let mut performed = 0;
    let mut improvements = 0;

    loop {
        // Policy evaluation
        loop {
            if performed >= config.max_sweeps {
                tracing::debug!(
                    "[policy] gave up after {} sweeps and {} improvement passes",
                    performed,
                    improvements
                );
                return Err(SolveError::NonConvergence {
                    algorithm: Solver::PolicyIteration,
                    sweeps: performed,
                });
            }

            let mut delta = 0.0f64;
            for state in maze.states() {
                let Some(next) = policy[state].and_then(|action| action.apply(state)) else {
                    continue;
                };
                let updated = q_value(&values, next, config.gamma);
                delta = delta.max((updated - values[state]).abs());
                values[state] = updated;
            }
            performed += 1;

            tracing::trace!("[policy] evaluation sweep {} delta {}", performed, delta);
            observer.emit(|| SolverEvent::Sweep {
                algorithm: Solver::PolicyIteration,
                sweep: performed,
                delta,
                values: values.as_slice().to_vec(),
            });

            if delta < config.theta {
                break;
            }
            sweeps += 1;
        }

        // Policy improvement
        improvements += 1;
        let mut stable = true;
        for state in maze.states().filter(|&s| s != terminal) {
            let Some((best_action, best_q)) = greedy_action(maze, &values, state, config.gamma)
            else {
                continue;
            };
            let current_q = policy[state]
                .and_then(|action| action.apply(state))
                .map(|next| q_value(&values, next, config.gamma));
            // Keep the current action when it is already among the best
            if current_q.is_some_and(|q| q >= best_q) {
                continue;
            }
            policy[state] = Some(best_action);
            stable = false;
        }
        tracing::trace!("[policy] improvement pass {} stable: {}", improvements, stable);

        if stable {
            break;
        }
    }

    let path = extract_policy_path(maze, &policy)?;
    tracing::debug!(
        "[policy] stable after {} improvement passes and {} evaluation sweeps: path length {}",
        improvements,
        sweeps,
        path.len()
    );
    observer.emit(|| SolverEvent::PathFound {
        algorithm: Solver::PolicyIteration,
        path: path.clone(),
    });

    Ok(MdpOutcome {
        values,
        policy,
        path,
        sweeps,
        improvements,
    })
}
