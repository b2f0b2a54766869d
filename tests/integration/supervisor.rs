use crate::*;

use std::time::Instant;

use c11n_client::{ClientError, Supervisor};
use c11n_core::{C11nConfig, ReadinessMode};

const SLEEPY_NODE: &str = "echo \"node booting with $0\" >&2\nexec sleep 30\n";

/// `sh <script>` plays the node: the script path is its config argument.
fn sh_supervisor(settle_ms: u64) -> Supervisor {
    Supervisor::new("sh").with_settle(Duration::from_millis(settle_ms))
}

fn node_config(script: &Path, socket: &Path) -> C11nConfig {
    let mut config = C11nConfig::default();
    config.node.binary = PathBuf::from("sh");
    config.node.config_path = script.to_path_buf();
    config.node.socket_path = socket.to_path_buf();
    config.node.settle_ms = 20;
    config
}

#[tokio::test]
async fn test_launch_returns_running_process_after_settle() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_node_script(dir.path(), "node.conf", SLEEPY_NODE).unwrap();

    let started = Instant::now();
    let mut node = sh_supervisor(150).launch(&script).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(150));

    assert!(node.id().is_some());
    assert_eq!(node.config_path(), script.as_path());
    assert!(node.try_wait().unwrap().is_none(), "node exited early");

    node.kill().await.unwrap();
    assert!(node.try_wait().unwrap().is_some());
}

/// A chatty node that floods stderr and exits must not stall launch or the
/// caller; the forwarding task drains it in the background.
#[tokio::test]
async fn test_stderr_forwarding_does_not_block() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_node_script(
        dir.path(),
        "chatty.conf",
        "i=0\nwhile [ $i -lt 5000 ]; do echo \"diagnostic line $i\" >&2; i=$((i+1)); done\nexit 0\n",
    )
    .unwrap();

    let mut node = sh_supervisor(10).launch(&script).await.unwrap();
    let status = tokio::time::timeout(Duration::from_secs(10), node.wait())
        .await
        .expect("node blocked on stderr")
        .unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_launch_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let err = Supervisor::new(dir.path().join("no-such-node"))
        .launch(&dir.path().join("node.conf"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Launch { .. }), "got {err}");
}

#[tokio::test]
async fn test_launch_non_executable_binary() {
    let dir = tempfile::tempdir().unwrap();
    let not_exec = write_node_script(dir.path(), "plain-file", "not a program").unwrap();
    let err = Supervisor::new(&not_exec)
        .launch(&dir.path().join("node.conf"))
        .await
        .unwrap_err();
    match err {
        ClientError::Launch { binary, source } => {
            assert_eq!(binary, not_exec);
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Launch, got {other}"),
    }
}

#[tokio::test]
async fn test_start_launches_and_probes() {
    let h = spawn_node().unwrap();
    let script = write_node_script(h.dir.path(), "node.conf", SLEEPY_NODE).unwrap();
    let config = node_config(&script, &h.socket);

    let (mut node, client) = c11n_client::start(&config).await.unwrap();
    assert_eq!(client.socket_path(), h.socket.as_path());
    assert!(!h.state.requests().is_empty(), "start did not probe");

    client.probe().await.unwrap();
    node.kill().await.unwrap();
}

#[tokio::test]
async fn test_start_polls_until_node_serves() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join(SOCKET_NAME);
    let script = write_node_script(dir.path(), "node.conf", SLEEPY_NODE).unwrap();
    let mut config = node_config(&script, &socket);
    config.readiness.mode = ReadinessMode::Poll;
    config.readiness.poll_interval_ms = 25;
    config.readiness.poll_timeout_ms = 3_000;

    let late_socket = socket.clone();
    let server = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        stub::serve(stub::node_router(stub::StubState::default()), &late_socket).unwrap()
    });

    let (mut node, _client) = c11n_client::start(&config).await.unwrap();
    node.kill().await.unwrap();
    server.await.unwrap().abort();
}

#[tokio::test]
async fn test_start_without_node_socket_fails() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join(SOCKET_NAME);
    let marker = dir.path().join("alive");
    let script = write_node_script(
        dir.path(),
        "node.conf",
        &format!("touch {}\nexec sleep 30\n", marker.display()),
    )
    .unwrap();

    let mut config = node_config(&script, &socket);
    config.node.settle_ms = 200;
    let err = c11n_client::start(&config).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {err}");

    let mut polling = config.clone();
    polling.readiness.mode = ReadinessMode::Poll;
    polling.readiness.poll_interval_ms = 20;
    polling.readiness.poll_timeout_ms = 100;
    let err = c11n_client::start(&polling).await.unwrap_err();
    assert!(matches!(err, ClientError::NotReady { .. }), "got {err}");

    // The script did run, so the launch itself worked.
    wait_for(Duration::from_secs(2), || marker.exists()).await.unwrap();
}
