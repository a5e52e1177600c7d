mod app;
mod pointer;

pub use app::*;
pub use pointer::*;
