pub mod accumulator;
