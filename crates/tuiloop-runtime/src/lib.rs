#![forbid(unsafe_code)]

//! Run loop for tuiloop.
//!
//! # Role in tuiloop
//! `tuiloop-runtime` is the platform-agnostic heart: it sequences input,
//! notifications, and update cycles on one logical thread, and brackets the
//! whole run with terminal mode entry and restoration. It knows the host only
//! through the traits in `tuiloop-backend`.
//!
//! # Key components
//! - [`Application`]: the context object and its loop.
//! - [`InputDispatcher`]: arrow decoding, end-of-transmission, forwarding.
//! - [`FocusNavigator`]: the single focused element.
//! - [`UpdateScheduler`]: invalidation coalescing and the update cycle.
//! - [`TerminalMode`]: echo and canonical mode, entered once, restored once.
//! - [`Lifecycle`]: `Uninitialized → Running → ShuttingDown → Terminated`.
//! - [`headless`]: a scripted host for tests.

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod focus;
pub mod headless;
pub mod lifecycle;
pub mod scheduler;
pub mod terminal_mode;
pub mod window;

pub use app::{Application, Host};
pub use config::{AppConfig, InputChoice};
pub use dispatcher::{Dispatch, InputDispatcher};
pub use focus::FocusNavigator;
pub use lifecycle::{Lifecycle, Phase, ShutdownReason};
pub use scheduler::UpdateScheduler;
pub use terminal_mode::TerminalMode;
pub use window::Window;
