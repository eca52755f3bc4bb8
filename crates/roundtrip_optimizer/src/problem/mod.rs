pub mod error;
pub mod location;
pub mod meters;
pub mod routing_problem;
pub mod shift;
pub mod stop;
pub mod time_window;
pub mod travel_cost_matrix;
