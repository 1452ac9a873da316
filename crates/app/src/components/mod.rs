pub mod complaint_board;
pub mod greeting;

pub use complaint_board::*;
pub use greeting::*;
