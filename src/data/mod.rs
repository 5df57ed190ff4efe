//! External data collaborators.
//!
//! - FRED API client with rate limiting (`fred`)
//! - the `ObservationSource` seam the synchronizer fetches through

pub mod fred;

pub use fred::*;
