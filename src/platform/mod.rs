mod handle;
mod registry;

pub use handle::Platform;
