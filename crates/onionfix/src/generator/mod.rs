mod basic;
mod batch;
#[cfg(test)]
mod tests;

pub use basic::*;
pub use batch::*;
