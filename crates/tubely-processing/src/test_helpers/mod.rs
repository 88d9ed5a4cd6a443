//! Test doubles for the pipeline's seams
//!
//! Available to this crate's unit tests and, through the `test-helpers` feature, to the
//! API integration tests.

pub mod fakes;
pub mod fixtures;
pub mod mock_storage;
pub mod video_store;

pub use fakes::{CopyRewriter, FakeInspector};
pub use fixtures::{scratch_entries, TestPipeline, TestPipelineBuilder};
pub use mock_storage::{MockObject, MockStorage};
pub use video_store::FallibleVideoStore;
