//! Mutable-name service: publish/resolve with caching, auto-refresh, and
//! append-only update history.

pub mod error;
pub mod refresh;
pub mod service;

pub use error::{NameError, NameResult};
pub use refresh::{spawn_refresh, RefreshHandle};
pub use service::{NameService, ResolveOptions};
