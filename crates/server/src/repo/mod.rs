pub mod complaint;
pub mod session;
pub mod user;
