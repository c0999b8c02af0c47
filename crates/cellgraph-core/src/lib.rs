//! cellgraph-core - UI-agnostic storage and rendering for cellgraph grids.

pub mod error;
pub mod render;
pub mod storage;

pub use error::{CoreError, Result};
pub use render::{print_texts, print_values, write_markdown};
pub use storage::{load_grd, parse_grd_content, write_grd, write_grd_content};

pub use cellgraph_engine::engine::{Grid, Position, Value};
