//! The session bridge: turns an identity-provider sign-in into a cookie-backed server
//! session and keeps the two in step.
//!
//! ```text
//! ANONYMOUS ──sign_in──▶ AUTHENTICATING ──provider ok──▶ BRIDGING ──2xx──▶ ESTABLISHED
//!     ▲                        │                            │
//!     └──────── FAILED ◀───────┴──── rejected / unreachable ┘
//! ```
//!
//! Identity notifications feed [`SessionBridge::reconcile`], which enters `BRIDGING`
//! directly when a live credential exists. Only one exchange is ever in flight.

mod bridge;
mod endpoint;
mod error;
mod navigator;
mod state;
mod status;

use std::sync::LazyLock;

use crate::logger::Logger;

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@dashboard/session"));

#[doc(inline)]
pub use bridge::{SessionBridge, SessionBridgeBuilder};

#[doc(inline)]
pub use endpoint::{LoginAck, SessionEndpoint, SessionProof};

#[doc(inline)]
pub use error::BridgeError;

#[doc(inline)]
pub use navigator::Navigator;

#[doc(inline)]
pub use state::{BridgeOutcome, BridgeState};

#[doc(inline)]
pub use status::{
    BridgeStatus, RenderedStatus, StatusDisplay, StatusKind, DEFAULT_SUCCESS_MESSAGE,
    IN_PROGRESS_MESSAGE, MISSING_INPUT_MESSAGE, SIGNED_OUT_PROMPT,
};
