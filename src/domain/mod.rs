// Domain layer - Measurement series and the pure operations over them
pub mod aggregate;
pub mod chart;
pub mod color;
pub mod dashboard;
pub mod merge;
pub mod motor;
pub mod series;
pub mod session;
pub mod units;
