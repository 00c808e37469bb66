mod common;

use std::time::Duration;

use bengine::Election;
use bengine::MessageBus;
use bengine::RawMessage;
use bengine::Topic;
use bengine::MALFORMED_PAYLOADS;
use common::wait_for_leader;
use common::TestCluster;
use tokio::time;

/// # Case 1: three peers converge on the highest identifier
///
/// Roster {3, 7, 2} is registered up front, then the peers start in an
/// arbitrary order. Criteria waves propagate until both 3 and 2 have
/// conceded to 7, at which point 7 announces and everyone records it.
#[tokio::test]
async fn test_three_peers_converge_on_highest_id() {
    let mut cluster = TestCluster::new();
    cluster.seed_members(&[3, 7, 2]).await;

    let node3 = cluster.start_peer(3);
    let node7 = cluster.start_peer(7);
    let node2 = cluster.start_peer(2);

    assert_eq!(wait_for_leader(&node3).await, 7);
    assert_eq!(wait_for_leader(&node7).await, 7);
    assert_eq!(wait_for_leader(&node2).await, 7);

    cluster.shutdown().await;
}

/// # Case 2: start order does not change the outcome
///
/// Same roster, the best candidate starts last.
#[tokio::test]
async fn test_convergence_is_start_order_independent() {
    let mut cluster = TestCluster::new();
    cluster.seed_members(&[3, 7, 2]).await;

    let node2 = cluster.start_peer(2);
    let node3 = cluster.start_peer(3);
    let node7 = cluster.start_peer(7);

    for node in [&node2, &node3, &node7] {
        assert_eq!(wait_for_leader(node).await, 7);
    }

    cluster.shutdown().await;
}

/// # Case 3: a malformed frame is dropped, not fatal
///
/// ## Validation criteria:
/// 1. Garbage bytes on the criteria topic are counted as dropped by every
///    peer that hears them
/// 2. The round still converges and both peers shut down cleanly
#[tokio::test]
async fn test_malformed_frame_does_not_stop_the_round() {
    let mut cluster = TestCluster::new();
    cluster.seed_members(&[3, 7]).await;

    let node3 = cluster.start_peer(3);
    let node7 = cluster.start_peer(7);

    // wait until both engines subscribed, then race garbage into the round
    time::timeout(Duration::from_secs(1), async {
        while cluster.bus.subscriber_count() < 2 {
            time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("both peers should subscribe");

    cluster
        .bus
        .publish(RawMessage {
            topic: Topic::Message,
            payload: vec![0xde, 0xad],
        })
        .await
        .expect("publish garbage frame");

    assert_eq!(wait_for_leader(&node3).await, 7);
    assert_eq!(wait_for_leader(&node7).await, 7);

    // the decision may outrun the garbage in a peer's queue; poll the drop
    // counter instead of asserting it immediately
    time::timeout(Duration::from_secs(2), async {
        loop {
            let all_counted = ["3", "7"].into_iter().all(|id| {
                MALFORMED_PAYLOADS
                    .with_label_values(&[id, Topic::Message.as_str()])
                    .get()
                    >= 1
            });
            if all_counted {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("both peers should count the dropped frame");

    cluster.shutdown().await;
}

/// # Case 4: losing the leader re-runs the round
///
/// ## Validation criteria:
/// 1. After every peer gets a `LeaderLost` injection, a fresh `node_elected`
///    frame for the same best candidate crosses the bus
/// 2. All peers end up decided on that candidate again
#[tokio::test]
async fn test_leader_lost_reconverges() {
    let mut cluster = TestCluster::new();
    cluster.seed_members(&[3, 7]).await;

    let node3 = cluster.start_peer(3);
    let node7 = cluster.start_peer(7);

    assert_eq!(wait_for_leader(&node3).await, 7);
    assert_eq!(wait_for_leader(&node7).await, 7);

    // settle, then watch for a result frame that is provably new
    time::sleep(Duration::from_millis(100)).await;
    let mut frames = cluster.bus.subscribe().expect("bus subscription");

    for node in [&node3, &node7] {
        node.trigger_leader_lost().await.expect("inject leader lost");
    }

    let reelected = time::timeout(Duration::from_secs(5), async {
        loop {
            let frame = frames.recv().await.expect("bus stays open");
            if frame.topic == Topic::NodeElected {
                let e: Election = bincode::deserialize(&frame.payload).expect("payload decodes");
                return e.id;
            }
        }
    })
    .await
    .expect("round should re-converge within the timeout");
    assert_eq!(reelected, 7);

    // the revocation cleared both peers' leader state, so any decided value
    // observed from here on is the re-run's result
    assert_eq!(wait_for_leader(&node3).await, 7);
    assert_eq!(wait_for_leader(&node7).await, 7);

    cluster.shutdown().await;
}
