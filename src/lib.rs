pub mod archive;
pub mod emit;
pub mod error;
pub mod generate;
pub mod ident;
pub mod trace;
pub mod ucd;

pub use generate::{generate, GenerateOptions};
