#![allow(dead_code)]

mod project;
mod store;

pub use project::TestProject;
pub use store::{RecordingObserver, StubProvider, StubResponse, chain};
