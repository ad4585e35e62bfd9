pub mod generator;
pub mod sampler;

pub use generator::{PackGenerator, VariableTarget};
pub use sampler::CumulativeSampler;
