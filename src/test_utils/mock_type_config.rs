use crate::MockMessageBus;
use crate::MockRegistry;
use crate::TypeConfig;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct MockTypeConfig;

impl TypeConfig for MockTypeConfig {
    type R = MockRegistry;

    type B = MockMessageBus;
}
