#![forbid(unsafe_code)]

//! tuiloop public facade.
//!
//! Re-exports the types an application needs, and adds the pieces that only
//! make sense at the edge of a process: wiring the native host
//! ([`native::open`]), installing a log subscriber
//! ([`logging::init_from_env`]), and turning the run result into an exit
//! status ([`exit::run_and_exit`]).
//!
//! ```no_run
//! use tuiloop::prelude::*;
//! # struct Blank;
//! # impl Surface for Blank {
//! #     fn layout(&mut self, _: Size) {}
//! #     fn draw(&mut self) -> Result<(), ViewError> { Ok(()) }
//! #     fn update(&mut self) -> Result<(), ViewError> { Ok(()) }
//! #     fn invalidate_size_cache(&mut self) {}
//! #     fn first_focusable(&self) -> Option<FocusRef> { None }
//! # }
//!
//! tuiloop::logging::init_from_env();
//! let config = AppConfig::from_env();
//! let host = tuiloop::native::open(&config).expect("open terminal");
//! let app = Application::new(host, Box::new(Blank), config).expect("size terminal");
//! tuiloop::exit::run_and_exit(app);
//! ```

pub mod exit;
pub mod logging;
#[cfg(unix)]
pub mod native;

// --- Core re-exports -------------------------------------------------------

pub use tuiloop_core::arrow::{ArrowDecoder, ArrowKeyParser};
pub use tuiloop_core::error::{EXIT_FATAL, EXIT_IO, Error, InputError, Result, TerminalError, ViewError};
pub use tuiloop_core::event::{DELETE, Direction, END_OF_TRANSMISSION, ESCAPE};
pub use tuiloop_core::geometry::{Point, Size};
pub use tuiloop_core::view::{
    FocusRef, Focusable, Invalidate, InvalidationSet, NodeRef, Surface, ViewNode, WeakFocus,
};

// --- Backend re-exports ----------------------------------------------------

pub use tuiloop_backend::{
    InputSource, InputStrategy, LocalModes, NotificationSource, Poster, RunQueue, Task,
    TerminalHost,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tuiloop_runtime::headless;
pub use tuiloop_runtime::{AppConfig, Application, Host, InputChoice, Phase, ShutdownReason};

/// Everything a typical application imports.
pub mod prelude {
    pub use crate::{
        AppConfig, Application, Direction, Error, FocusRef, Focusable, Host, Invalidate, NodeRef,
        Point, Size, Surface, ViewError, ViewNode, WeakFocus,
    };
}
