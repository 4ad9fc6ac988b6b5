//! End-to-end tests for the snapshot publisher

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use agent_graph::api::create_router;
use agent_graph::client::{decode_message, ChannelClient};
use agent_graph::{AppState, ChannelMessage, Config, GraphViewController};

const WAIT: Duration = Duration::from_secs(5);

async fn start_server(interval_ms: u64) -> (Arc<AppState>, SocketAddr) {
    let config = Config::default().with_interval(Duration::from_millis(interval_ms));
    let state = Arc::new(AppState::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, addr)
}

async fn wait_for<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_client_receives_snapshots() {
    let (_state, addr) = start_server(50).await;

    let (client, mut snapshots) = ChannelClient::connect(&format!("ws://{}/ws", addr))
        .await
        .unwrap();

    let snapshot = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert_eq!(snapshot.agent_count(), 2);
    assert_eq!(snapshot.tool_count(), 3);

    let mut controller = GraphViewController::new();
    let summary = controller.apply_snapshot(&snapshot);
    assert_eq!(summary.nodes, 5);
    assert_eq!(summary.edges, 3);

    client.disconnect().await;
}

#[tokio::test]
async fn test_connection_installs_channel_once() {
    let (state, addr) = start_server(50).await;
    assert!(state.channel().is_none());

    let (first, mut rx1) = ChannelClient::connect(&format!("ws://{}/ws", addr)).await.unwrap();
    timeout(WAIT, rx1.recv()).await.unwrap().unwrap();
    let channel = state.channel().unwrap();

    let (second, mut rx2) = ChannelClient::connect(&format!("ws://{}/ws", addr)).await.unwrap();
    timeout(WAIT, rx2.recv()).await.unwrap().unwrap();

    assert!(Arc::ptr_eq(&channel, &state.channel().unwrap()));
    wait_for(|| channel.active_feeds() == 2).await;

    drop(first);
    drop(second);
}

#[tokio::test]
async fn test_feed_released_on_disconnect() {
    let (state, addr) = start_server(50).await;

    let (client, mut snapshots) = ChannelClient::connect(&format!("ws://{}/ws", addr))
        .await
        .unwrap();
    timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();

    let channel = state.channel().unwrap();
    assert_eq!(channel.active_feeds(), 1);

    client.disconnect().await;
    wait_for(|| channel.active_feeds() == 0).await;

    let sent = channel.snapshots_sent();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(channel.snapshots_sent(), sent);
}

#[tokio::test]
async fn test_welcome_then_graph_update_and_pong() {
    let (_state, addr) = start_server(100).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    let first = timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
    let Message::Text(text) = first else {
        panic!("expected text frame");
    };
    assert!(matches!(
        decode_message(&text),
        Some(ChannelMessage::Connected { .. })
    ));

    ws.send(Message::Text(r#"{"type":"ping"}"#.to_string()))
        .await
        .unwrap();

    let mut saw_pong = false;
    let mut saw_update = false;
    while !(saw_pong && saw_update) {
        let frame = timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
        if let Message::Text(text) = frame {
            match decode_message(&text) {
                Some(ChannelMessage::Pong) => saw_pong = true,
                Some(ChannelMessage::GraphUpdate { payload, .. }) => {
                    assert_eq!(payload.query, "Sample query");
                    assert_eq!(payload.idx.len(), 9);
                    saw_update = true;
                }
                other => panic!("unexpected message: {:?}", other),
            }
        }
    }

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn test_sequence_ids_increase() {
    let (_state, addr) = start_server(30).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    let mut sequence_ids = Vec::new();
    while sequence_ids.len() < 3 {
        let frame = timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
        if let Message::Text(text) = frame {
            if let Some(ChannelMessage::GraphUpdate { sequence_id, .. }) = decode_message(&text) {
                sequence_ids.push(sequence_id);
            }
        }
    }

    assert!(sequence_ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_sse_stream_pushes_graph_updates() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let (state, addr) = start_server(50).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /api/graph/stream HTTP/1.1\r\nHost: {}\r\nAccept: text/event-stream\r\n\r\n",
        addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut body = String::new();
    let mut buf = [0u8; 4096];
    timeout(WAIT, async {
        let complete_update = |body: &str| {
            body.split("event: graphUpdate")
                .nth(1)
                .map_or(false, |rest| rest.contains("\n\n"))
        };
        while !complete_update(&body) {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "stream ended early");
            body.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .expect("no graphUpdate event in time");

    assert!(body.starts_with("HTTP/1.1 200"));
    assert!(body.contains("text/event-stream"));
    assert!(body.contains("event: welcome"));
    assert!(body.contains(r#""type":"welcome""#));

    let update_line = body
        .split("event: graphUpdate")
        .nth(1)
        .and_then(|rest| rest.lines().find(|l| l.starts_with("data: ")))
        .unwrap();
    let update = decode_message(update_line.trim_start_matches("data: ").trim()).unwrap();
    let snapshot = update.into_snapshot().unwrap();
    assert_eq!(snapshot.agent_count(), 2);
    assert_eq!(snapshot.tool_count(), 3);

    let channel = state.channel().unwrap();
    assert_eq!(channel.active_feeds(), 1);

    drop(stream);
    wait_for(|| channel.active_feeds() == 0).await;
}
