pub mod aggregate;
pub mod views;
