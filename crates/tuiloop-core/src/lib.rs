#![forbid(unsafe_code)]

//! Core: input vocabulary, view contracts, and the error model.
//!
//! # Role in tuiloop
//! `tuiloop-core` is the shared language of the workspace. The backend crate
//! describes the host boundary in these terms, the tty crate produces these
//! values from a real terminal, and the runtime crate consumes them on the
//! main sequencing point.
//!
//! # Primary responsibilities
//! - **Input**: navigation [`Direction`]s and the control characters the run
//!   loop reacts to.
//! - **Arrow decoding**: the [`ArrowDecoder`] contract and the stock VT
//!   [`ArrowKeyParser`].
//! - **View contracts**: [`ViewNode`], [`Focusable`], [`Surface`], and the
//!   deduplicated [`InvalidationSet`].
//! - **Cooperative stop**: [`StopSource`]/[`StopToken`] for input workers.
//! - **Errors**: [`Error`] and its domain-specific parts.

pub mod arrow;
pub mod error;
pub mod event;
pub mod geometry;
pub mod stop;
pub mod view;

pub use arrow::{ArrowDecoder, ArrowKeyParser};
pub use error::{Error, InputError, Result, TerminalError, ViewError};
pub use event::{Direction, END_OF_TRANSMISSION, ESCAPE};
pub use geometry::{Point, Size};
pub use stop::{StopSource, StopToken};
pub use view::{FocusRef, Focusable, Invalidate, InvalidationSet, NodeRef, Surface, ViewNode, WeakFocus};
