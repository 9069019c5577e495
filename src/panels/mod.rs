//! Data panels: each named region of the dashboard page is filled by one
//! fetch-and-render cycle against the dashboard API.

mod dashboard;
mod error;
mod loader;
pub mod model;
pub mod render;
mod region;

use std::sync::LazyLock;

use crate::logger::Logger;

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@dashboard/panels"));

#[doc(inline)]
pub use dashboard::{Dashboard, DashboardSummary, PanelOutcome};

#[doc(inline)]
pub use error::{PanelError, PanelResult};

#[doc(inline)]
pub use loader::PanelLoader;

#[doc(inline)]
pub use region::{BarChart, ChartSink, Region};
