//! # kas-dns-provider
//!
//! A client for the DNS record actions of the all-inkl.com KAS API, the
//! SOAP interface of the KAS control panel.
//!
//! KAS wraps a JSON request inside a SOAP envelope and answers with an
//! untyped XML value tree. This crate takes care of:
//!
//! - **Session login**: every operation logs in with the account password
//!   unless a [`SessionToken`] is passed in through its [`CallContext`].
//! - **Flood control**: the server declares a minimum delay after every
//!   call; a [`KasProvider`] waits for it before its next request.
//! - **Decoding**: [`decode`] builds the generic value tree, [`value::resolve`]
//!   classifies it and [`value::map_value`] maps it onto typed results.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kas_dns_provider::{CallContext, DnsRecord, DnsRecordProvider, KasProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from ALLINKL_USERNAME / ALLINKL_PASSWORD
//!     let provider = KasProvider::from_env()?;
//!     let ctx = CallContext::new();
//!
//!     let record = DnsRecord::new("example.com.", "A", "www", "192.0.2.1", 0);
//!     let id = provider.create_record(&ctx, &record).await?;
//!
//!     for r in provider.list_records(&ctx, "example.com.", Some(&id)).await? {
//!         println!("{} {} {} -> {}", r.id, r.record_type, r.record_name, r.record_data);
//!     }
//!
//!     provider.delete_record(&ctx, &id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Sharing a session
//!
//! ```rust,no_run
//! # use kas_dns_provider::*;
//! # async fn example(provider: &KasProvider) -> Result<()> {
//! let token = provider.login(&CallContext::new()).await?;
//! let ctx = CallContext::new().with_session(token);
//! let records = provider.list_records(&ctx, "example.com.", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, KasError>`](KasError). Set
//! `LEGO_DEBUG_CLIENT_VERBOSE_ERROR=true` to include the request method and
//! URL in transport errors. Nothing is retried automatically.

mod credentials;
pub mod decode;
mod envelope;
mod error;
mod flood;
mod http_client;
mod providers;
mod session;
mod traits;
mod types;
mod utils;
pub mod value;

pub use credentials::{ENV_PASSWORD, ENV_USERNAME, ENV_VERBOSE_ERRORS, KasCredentials};
pub use envelope::{AuthRequest, KasRequest, encode_api_envelope, encode_auth_envelope};
pub use error::{KasError, Result};
pub use flood::FloodControl;
pub use providers::{KAS_API_URL, KAS_AUTH_URL, KasProvider, KasProviderBuilder};
pub use session::{CallContext, SessionToken};
pub use traits::DnsRecordProvider;
pub use types::{DnsRecord, ImportId};

/// Re-exported so callers can build a [`CallContext`] cancellation signal.
pub use tokio_util::sync::CancellationToken;
