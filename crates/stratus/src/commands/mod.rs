pub mod audit;
pub mod infra;
pub mod providers;
pub mod provision;
pub mod resource;
