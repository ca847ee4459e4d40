pub mod container;
pub mod error;
pub mod types;
pub mod value;

pub use container::{MemoryContainer, PackageContainer};
pub use error::OdeError;
pub use types::*;
pub use value::*;
