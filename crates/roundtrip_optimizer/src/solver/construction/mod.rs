pub mod cheapest_insertion;
pub mod infeasibility;
