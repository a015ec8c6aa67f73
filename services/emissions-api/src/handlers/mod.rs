pub mod emissions;
pub mod health;
pub mod reports;

pub use emissions::*;
pub use health::*;
pub use reports::*;
