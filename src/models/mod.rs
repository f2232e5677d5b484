//! Data models

pub mod reading;
pub mod supervisor;
pub mod alert;

pub use reading::*;
pub use supervisor::*;
pub use alert::*;
