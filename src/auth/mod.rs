//! Authentication for the Domo API.
//!
//! Domo uses the OAuth2 client-credentials grant: a client id and secret
//! are exchanged at `/oauth/token` for a short-lived bearer token. The
//! token carries its own expiration in an embedded claim, which
//! [`Credentials`] decodes to renew ahead of time.
//!
//! ```no_run
//! use domo_rs::{ClientConfig, DomoClient};
//!
//! # async fn example() -> domo_rs::Result<()> {
//! let client = DomoClient::with_config(
//!     "client-id",
//!     "client-secret",
//!     ClientConfig::default().with_scope("data user"),
//! )
//! .await?;
//!
//! // Force a renewal, e.g. after rotating the secret server-side.
//! client.credentials().renew().await?;
//! # Ok(())
//! # }
//! ```

mod credentials;

pub use credentials::Credentials;
