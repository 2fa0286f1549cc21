pub mod renewal;
pub mod repository;
