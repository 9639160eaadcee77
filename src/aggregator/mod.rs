pub mod normalize;
pub mod pipeline;

pub use pipeline::Aggregator;
