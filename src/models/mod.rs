pub mod launch;
pub mod prediction;
pub mod settings;

pub use launch::*;
pub use prediction::*;
pub use settings::*;
