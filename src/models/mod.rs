pub mod board;
pub mod solution;
pub mod risk;
pub mod kpi;

pub use board::*;
pub use solution::*;
pub use risk::*;
pub use kpi::*;
