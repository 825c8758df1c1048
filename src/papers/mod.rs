//! Academic paper search (CORE API v3).

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{CoreClient, PaperSearch};
pub use config::PaperSearchConfig;
pub use error::PaperSearchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockPaperSearch, raw_work};
pub use model::{PaperQuery, RawWork, SortField, SortOrder, Work};
