//! Browser-independent core of the fan-club subscription form.
//!
//! Everything here is plain Rust so it can be exercised natively; the WASM
//! frontend implements the small traits (`FieldSurface`, `ProgressSource`,
//! `Notifier`, `SubmitUi`, `SubmissionTransport`, `Clock`) on top of the DOM.

pub mod address;
pub mod audit;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod phone;
pub mod progress;
pub mod readiness;
pub mod rules;
pub mod submission;
pub mod toast;
pub mod validator;

pub use config::FormConfig;
pub use error::{FormError, FormResult};
