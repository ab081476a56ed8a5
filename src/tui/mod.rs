//! Terminal presentation: the color theme and a read-only dashboard viewer.

pub mod theme;
mod viewer;

pub use theme::{Theme, ThemeVariant};
pub use viewer::{Viewer, run_viewer};
