pub mod guided_local_search;
pub mod penalties;
