//! Selection and analysis state controller.
//!
//! The controller owns the selected image, its preview, the loading flag, the
//! last error and the last result, and moves between phases:
//!
//! ```text
//! Idle ──select──▶ Ready ──submit──▶ Analyzing ──ok──▶ Done
//!   │                ▲                   │
//!   └──invalid──▶ Errored ◀────err───────┘
//! ```
//!
//! Every submission carries a generation ticket. A completion is applied only
//! while its ticket is still the one in flight, so a request superseded by a
//! newer selection or submission can never overwrite newer state.

mod shared;
mod state;

pub use shared::SharedController;
pub use state::{Controller, ControllerSnapshot, Phase, Submission};
