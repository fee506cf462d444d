//! # Verification Client
//!
//! Client side of the laboratory bottle verification flow.
//!
//! ## Flow
//!
//! - Log in, token kept in an explicit [`AuthSession`]
//! - Dashboard counters and the paged list of received samples
//! - Open the scanner, decode a sample QR code (or type the number)
//! - Backend answers with the bottles already counted for that sample plus
//!   the increments from this scan
//! - Adjust counts per bottle type until every type is ready
//! - Submit the checklist
//!
//! ## Transport
//!
//! Routed calls are multipart forms posted to `/route`, with the target
//! operation in an encoded `X-Slice` header (see the `slice` crate). Login and
//! the token check use their own endpoints with JSON bodies.
//!
//! ## Notes
//!
//! - Result codes live in the body (`"200"`, `201`), not in the HTTP status
//! - A 403 anywhere logs the user out
//! - Camera and toasts belong to the embedding UI, see [`Camera`] and
//!   [`Notifier`]

pub mod api;
pub mod auth;
pub mod camera;
pub mod checklist;
pub mod config;
pub mod error;
pub mod feed;
pub mod form;
pub mod models;
pub mod notice;
pub mod session;

pub use api::{HttpApi, SampleApi};
pub use auth::AuthSession;
pub use camera::{Camera, CameraId, Facing, ScanSession};
pub use checklist::BottleChecklist;
pub use config::Config;
pub use error::{ApiError, CameraError, ConfigError, SessionError};
pub use feed::{SampleFeed, SampleSource};
pub use notice::{Level, Notice, NoticeLog, Notifier, TracingNotifier};
pub use session::{BottleSession, State};
