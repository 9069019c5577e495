//! Test utilities shared across crate-level unit tests.

pub mod fakes;
pub mod http;

pub use fakes::{
    MemoryRegion, RecordingChart, RecordingNavigator, RecordingStatus, ScriptedIdentity,
    SCRIPTED_ID_TOKEN,
};
pub use http::start_mock_server;
