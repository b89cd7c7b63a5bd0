pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod subscription;

pub use access::*;
pub use config::*;
pub use error::*;
pub use models::*;
pub use subscription::*;
