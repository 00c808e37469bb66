//! the test_utils folder here will share utils or test components betwee unit
//! tests and integrations tests
mod common;
pub mod mock_type_config;

pub use common::*;
pub use mock_type_config::*;
