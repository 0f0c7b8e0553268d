//! strokeplot
pub mod core;
pub mod data;
pub mod font_source;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod rendering;
pub mod systems;
#[cfg(test)]
mod tests;
pub mod transport;
