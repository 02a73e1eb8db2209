// Application layer - use cases and orchestration.
// The CLI talks to `PointsService`; the spend algorithm itself lives in the domain.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
