use jiff::SignedDuration;

pub const DEFAULT_DEADLINE: SignedDuration = SignedDuration::from_secs(30);
pub const DEFAULT_LAMBDA_COEFFICIENT: f64 = 0.1;
pub const DEFAULT_DEADLINE_CHECK_INTERVAL: usize = 1024;

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// Wall-clock budget shared by local search and guided local search
    pub deadline: SignedDuration,

    /// Scales the penalty term relative to the average edge length of the best route
    pub lambda_coefficient: f64,

    /// Number of evaluated moves between two deadline checks
    pub deadline_check_interval: usize,

    pub run_local_search: bool,
    pub run_guided_local_search: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            deadline: DEFAULT_DEADLINE,
            lambda_coefficient: DEFAULT_LAMBDA_COEFFICIENT,
            deadline_check_interval: DEFAULT_DEADLINE_CHECK_INTERVAL,
            run_local_search: true,
            run_guided_local_search: true,
        }
    }
}
