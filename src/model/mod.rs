pub mod likelihood;
pub mod priors;

pub use likelihood::*;
pub use priors::*;
