//! Commutation-function engines: ordinary-life and universal-life.

pub mod ol;
pub mod ul;

pub use ol::OlCommFns;
pub use ul::UlCommFns;
