//! Blocking client for the Advent of Code website.
//!
//! Covers what a local solver workspace needs: checking that a session
//! cookie is still valid, downloading personal puzzle inputs, and knowing
//! when a puzzle unlocks.
//!
//! ```no_run
//! use aoc_http_client::AocClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AocClient::new()?;
//! let session = "your_session_cookie_here";
//!
//! if let Some(user_id) = client.verify_session(session)?.user_id {
//!     println!("Logged in as #{user_id}");
//! }
//! let input = client.get_input(2023, 1, session)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod settings;
mod unlock;

pub use client::{AocClient, AocClientBuilder, SessionInfo};
pub use error::AocError;
pub use unlock::{time_until_unlock, unlock_time};
