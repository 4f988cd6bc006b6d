mod common;

mod engine;
mod incremental;
