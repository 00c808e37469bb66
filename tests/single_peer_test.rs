mod common;

use std::time::Duration;

use bengine::Election;
use bengine::MessageBus;
use bengine::Topic;
use common::wait_for_leader;
use common::TestCluster;
use tokio::time;

/// # Case 1: a peer with no company elects itself
///
/// The peer hears its own initial broadcast, registers, finds itself alone
/// on the membership list, and claims leadership.
///
/// ## Validation criteria:
/// 1. The leader watch resolves to the peer's own id
/// 2. Exactly one `node_elected` frame crosses the bus
#[tokio::test]
async fn test_lone_peer_elects_itself_exactly_once() {
    let mut cluster = TestCluster::new();

    // observe the bus from the outside before any peer starts
    let mut frames = cluster.bus.subscribe().expect("bus subscription");

    let node = cluster.start_peer(7);
    assert_eq!(wait_for_leader(&node).await, 7);

    // drain what the round produced; no further result frame may follow
    let mut elected = Vec::new();
    loop {
        match time::timeout(Duration::from_millis(200), frames.recv()).await {
            Ok(Ok(frame)) => {
                if frame.topic == Topic::NodeElected {
                    let e: Election = bincode::deserialize(&frame.payload).expect("payload decodes");
                    elected.push(e.id);
                }
            }
            Ok(Err(_)) | Err(_) => break,
        }
    }
    assert_eq!(elected, vec![7]);

    cluster.shutdown().await;
}
