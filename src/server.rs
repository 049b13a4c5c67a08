//! Command loop - the single owner of all inbound commands
//!
//! Reads protocol lines from the input stream, funnels every command
//! through one receive loop so transitions apply in arrival order, and
//! writes replies and unsolicited lifecycle events to the output stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use trackd_core::prelude::*;
use trackd_core::ServiceEvent;
use trackd_service::{protocol, Command, CommandBridge, Inbound, Intent, PlatformShim};

/// Whether the loop keeps serving after a line
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Serve commands until `QUIT` or end of input.
///
/// Generic over the streams so tests can drive the loop over in-memory
/// pipes instead of the process stdio.
pub async fn run<S, R, W>(
    bridge: CommandBridge<S>,
    mut event_rx: mpsc::Receiver<ServiceEvent>,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    S: PlatformShim,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut events_open = true;

    loop {
        // Biased: pending lifecycle events flush before the next command
        // is read, so a command's reply and its events stay ordered.
        tokio::select! {
            biased;

            event = event_rx.recv(), if events_open => match event {
                Some(event) => {
                    debug!("Emitting event: {}", event.summary());
                    write_line(&mut writer, &protocol::format_event(&event)).await?;
                }
                None => events_open = false,
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if handle_line(&bridge, &line, &mut writer).await? == Flow::Quit {
                        info!("Quit requested");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input stream closed");
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },
        }
    }

    Ok(())
}

/// Parse and serve one inbound line
async fn handle_line<S, W>(bridge: &CommandBridge<S>, line: &str, writer: &mut W) -> Result<Flow>
where
    S: PlatformShim,
    W: AsyncWrite + Unpin,
{
    let Some(inbound) = protocol::parse_line(line) else {
        if !line.trim().is_empty() {
            warn!("Skipping malformed line: {}", line.trim());
        }
        return Ok(Flow::Continue);
    };

    match inbound {
        Inbound::Request { id, method } => {
            let reply = bridge.dispatch_method(&method).await;
            write_line(writer, &protocol::format_reply(&id, &reply)).await?;
        }
        // Host intents are fire-and-forget: no reply line, outcomes are
        // visible only through the event stream and the log.
        Inbound::Intent(Intent::Start) => {
            let reply = bridge.dispatch(Command::Start).await;
            if !reply.is_success() {
                warn!("START intent failed: {:?}", reply);
            }
        }
        Inbound::Intent(Intent::Stop) => {
            let reply = bridge.dispatch(Command::Stop).await;
            if !reply.is_success() {
                warn!("STOP intent failed: {:?}", reply);
            }
        }
        Inbound::Intent(Intent::Quit) => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Write one protocol line followed by a newline, flushed
async fn write_line<W>(writer: &mut W, line: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;
    use trackd_core::{ChannelConfig, PersistentNotification, ServiceState};
    use trackd_service::test_utils::FakeShim;
    use trackd_service::{PermissionGate, ServiceController};

    fn make_bridge(
        shim: &Arc<FakeShim>,
    ) -> (
        CommandBridge<FakeShim>,
        mpsc::Receiver<ServiceEvent>,
        Arc<ServiceController<FakeShim>>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let controller = Arc::new(
            ServiceController::new(
                Arc::clone(shim),
                ChannelConfig::default(),
                PersistentNotification::default(),
            )
            .with_events(event_tx),
        );
        let gate = PermissionGate::new(Arc::clone(shim));
        let bridge = CommandBridge::new(Arc::clone(&controller), gate);
        (bridge, event_rx, controller)
    }

    /// Drive the loop over in-memory pipes and collect its output lines
    async fn serve(
        input: &str,
        shim: &Arc<FakeShim>,
    ) -> (Vec<String>, Arc<ServiceController<FakeShim>>) {
        let (bridge, event_rx, controller) = make_bridge(shim);

        let (mut client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);

        client.write_all(input.as_bytes()).await.unwrap();
        // Half-close the client so the loop sees EOF after the last line.
        client.shutdown().await.unwrap();

        run(bridge, event_rx, server_read, server_write)
            .await
            .unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        let lines = output.lines().map(str::to_string).collect();
        (lines, controller)
    }

    fn parsed(line: &str) -> serde_json::Value {
        let inner = line.trim().trim_start_matches('[').trim_end_matches(']');
        serde_json::from_str(inner).unwrap()
    }

    #[tokio::test]
    async fn test_start_request_replies_and_emits_event() {
        let shim = Arc::new(FakeShim::new());
        let input = "[{\"id\": 1, \"method\": \"startBackgroundService\"}]\nQUIT\n";

        let (lines, controller) = serve(input, &shim).await;

        assert_eq!(controller.state(), ServiceState::Running);

        let reply = parsed(&lines[0]);
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["success"], true);

        let event = parsed(&lines[1]);
        assert_eq!(event["event"], "service.started");
    }

    #[tokio::test]
    async fn test_commands_apply_in_arrival_order() {
        let shim = Arc::new(FakeShim::new());
        let input = "\
[{\"id\": 1, \"method\": \"startBackgroundService\"}]\n\
[{\"id\": 2, \"method\": \"stopBackgroundService\"}]\n\
QUIT\n";

        let (lines, controller) = serve(input, &shim).await;

        assert_eq!(controller.state(), ServiceState::Stopped);
        assert_eq!(parsed(&lines[0])["id"], 1);
        assert!(lines
            .iter()
            .any(|l| parsed(l)["event"] == "service.stopped"));
    }

    #[tokio::test]
    async fn test_permission_request_replies_with_bool() {
        let shim = Arc::new(FakeShim::new());
        let input = "[{\"id\": 7, \"method\": \"checkLocationPermissions\"}]\nQUIT\n";

        let (lines, _) = serve(input, &shim).await;

        let reply = parsed(&lines[0]);
        assert_eq!(reply["id"], 7);
        assert_eq!(reply["result"], false);
    }

    #[tokio::test]
    async fn test_unknown_method_replies_unimplemented() {
        let shim = Arc::new(FakeShim::new());
        let input = "[{\"id\": 3, \"method\": \"takeScreenshot\"}]\nQUIT\n";

        let (lines, _) = serve(input, &shim).await;

        let reply = parsed(&lines[0]);
        assert_eq!(reply["error"]["code"], "UNIMPLEMENTED");
    }

    #[tokio::test]
    async fn test_intents_drive_transitions_without_replies() {
        let shim = Arc::new(FakeShim::new());
        let input = "START\nSTOP\nQUIT\n";

        let (lines, controller) = serve(input, &shim).await;

        assert_eq!(controller.state(), ServiceState::Stopped);
        assert_eq!(shim.promote_count(), 1);
        assert_eq!(shim.demote_count(), 1);

        // Only events on the wire, no request replies
        for line in &lines {
            assert!(parsed(line).get("event").is_some());
        }
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let shim = Arc::new(FakeShim::new());
        let input = "garbage\n[{\"id\": 1, \"method\": \"stopBackgroundService\"}]\nQUIT\n";

        let (lines, _) = serve(input, &shim).await;

        let reply = parsed(&lines[0]);
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["success"], true);
    }

    #[tokio::test]
    async fn test_loop_ends_on_eof() {
        let shim = Arc::new(FakeShim::new());
        // No QUIT: the loop must end when input closes.
        let (lines, _) = serve("[{\"id\": 1, \"method\": \"startBackgroundService\"}]\n", &shim).await;

        assert!(!lines.is_empty());
    }

    #[tokio::test]
    async fn test_start_failure_reported_in_reply_and_event() {
        let shim = Arc::new(FakeShim::new());
        shim.fail_promote("background-start restriction");
        let input = "[{\"id\": 4, \"method\": \"startBackgroundService\"}]\nQUIT\n";

        let (lines, controller) = serve(input, &shim).await;

        assert_eq!(controller.state(), ServiceState::Stopped);

        let reply = parsed(&lines[0]);
        assert_eq!(reply["error"]["code"], "SERVICE_ERROR");

        let event = parsed(&lines[1]);
        assert_eq!(event["event"], "service.startFailed");
        assert!(event["params"]["reason"]
            .as_str()
            .unwrap()
            .contains("restriction"));
    }
}
