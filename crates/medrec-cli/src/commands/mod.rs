pub mod check;
pub mod operations;
pub mod visits;
