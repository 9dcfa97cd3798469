// PRAS → IdM organization sync - core library
//
// Keeps the IdM core's organization collection in step with the PRAS
// organisation structure. Runs as a scheduled worker (see worker/main.rs).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
