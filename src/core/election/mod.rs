mod engine;
mod tracker;

pub use engine::*;
pub use tracker::*;

#[cfg(test)]
mod tracker_test;
