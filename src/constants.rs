// -
// Bus topic namespaces

/// Criteria broadcast topic.
pub(crate) const TOPIC_MESSAGE: &str = "election:message";
/// Announces a newly joined peer.
pub(crate) const TOPIC_NODE_ENTERED: &str = "election:node_entered";
/// Announces the final election result.
pub(crate) const TOPIC_NODE_ELECTED: &str = "election:node_elected";
