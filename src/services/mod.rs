pub mod assembler;
pub mod catalog;
pub mod engagement;
pub mod filter;
pub mod popularity;
pub mod recommendations;
pub mod scoring;
