pub mod config;
pub mod error;
pub mod point;
pub mod series;

pub use config::Config;
pub use error::*;
pub use point::*;
pub use series::*;
