pub mod locks;
pub mod path;

pub use locks::PathLocks;
pub use path::{resolve_existing, resolve_for_create};
