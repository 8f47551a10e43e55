pub mod asset;
pub mod cli;
pub mod config;
pub mod container;
pub mod generator;
pub mod rasterize;
pub mod sizes;
pub mod tools;

#[cfg(all(test, unix))]
pub(crate) mod testing;

/// Build info
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
