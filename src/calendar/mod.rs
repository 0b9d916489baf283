pub mod aggregator;
pub mod assembler;
pub mod duration;
pub mod error;
pub mod index;
pub mod ports;
pub mod range;
pub mod resolver;
pub mod sync;
