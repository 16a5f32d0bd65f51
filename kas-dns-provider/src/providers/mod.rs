//! DNS Provider implementations

mod kas;

pub use kas::{KAS_API_URL, KAS_AUTH_URL, KasProvider, KasProviderBuilder};
