//! Graph provider: compressed adjacency patterns in natural and transposed orientation.

pub mod adjacency;
pub mod csr;

pub use adjacency::Adjacency;
pub use csr::CsrPattern;
