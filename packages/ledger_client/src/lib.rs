//! # Ledger client
//!
//! A typed client for the `/organisation/accounts` resource of a ledger REST API.
//!
//! Every request and response body travels inside a `{"data": ...}` envelope.
//! The API reports failures as `{"error_message": "..."}`, and such a body
//! fails the call even when the status code says success. The [`Response`]
//! is handed back on success and attached to every failure that happened
//! after the remote answered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledger_client::{Account, AccountsService, ClientOptions, create_uuid};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), ledger_client::ClientError> {
//! let service = AccountsService::with_options(ClientOptions::default())?;
//! let ctx = CancellationToken::new();
//!
//! let account: Account = Account::new(create_uuid(), create_uuid());
//! let (saved, resp) = service.create(Some(&ctx), &account).await?;
//! println!("created {} ({})", saved.id, resp.status());
//!
//! match service.by_id(Some(&ctx), "missing").await {
//!     Ok((account, _)) => println!("found {}", account.id),
//!     Err(e) => println!("{} -> {:?}", e, e.status()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod ids;

pub use accounts::{
    Account, AccountAttributes, AccountListOptions, AccountsService, ConfirmationOfPayeeAccount,
    ConfirmationOfPayeeAttributes,
};
pub use client::{Client, Response};
pub use config::{ClientOptions, load_options};
pub use error::{ClientError, Result, TransportFailure};
pub use ids::create_uuid;
