pub mod runner;

pub use runner::{AggregateError, AggregationRunner};

#[cfg(test)]
mod tests;
