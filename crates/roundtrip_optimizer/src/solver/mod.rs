pub mod construction;
pub mod diagnostics;
pub mod feasibility;
pub mod gls;
pub mod ls;
pub mod objective;
pub mod solution;
pub mod solver;
pub mod solver_params;
pub mod statistics;
