//! the test_utils folder here will share builders and mock components
//! between unit tests
mod common;
mod mock_type_config;

pub(crate) use common::*;
pub use mock_type_config::*;
