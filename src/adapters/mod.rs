// Adapters layer: concrete implementations for the files the tool reads and writes.

pub mod result_log;
pub mod roster;
