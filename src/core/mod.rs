pub mod job;
pub mod parser;
