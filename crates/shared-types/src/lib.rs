pub mod error;
pub mod feature_flags;

// Complaint desk domain
pub mod complaint;
pub mod dashboard;
pub mod navigation;
pub mod user;

pub use error::*;
pub use feature_flags::*;

pub use complaint::*;
pub use navigation::*;
pub use user::*;
// dashboard types are NOT glob re-exported; use shared_types::dashboard::*.
