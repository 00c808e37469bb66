use std::fmt::Debug;

use crate::MessageBus;
use crate::Registry;

/// **This coding style learned from OpenRaft project type config.**
///
/// Binds the two external collaborators of the election engine (the shared
/// membership registry and the pub/sub messaging bus) behind one generic
/// parameter.
pub trait TypeConfig:
    Sync + Send + Sized + Debug + Clone + Copy + Default + Eq + PartialEq + 'static
{
    type R: Registry;

    type B: MessageBus;
}

pub mod alias {
    use super::TypeConfig;

    pub type ROF<T> = <T as TypeConfig>::R;

    pub type BOF<T> = <T as TypeConfig>::B;
}

/// Production wiring: in-process shared registry and broadcast bus.
///
/// Deployments that back the registry or bus with an external store implement
/// [`Registry`]/[`MessageBus`] themselves and provide their own config type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastTypeConfig;

impl TypeConfig for BroadcastTypeConfig {
    type R = crate::MemRegistry;

    type B = crate::BroadcastBus;
}
