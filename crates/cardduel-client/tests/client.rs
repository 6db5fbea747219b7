//! Integration tests for the client against a scripted server on a real
//! loopback socket.

use std::time::Duration;

use cardduel_client::{ClientError, DeckSource, DuelClient};
use cardduel_protocol::{
    Card, CardId, Command, CommandCode, PlayerId, PlayerInfo, PublicState, ServerMessage,
    WireMessage,
};
use cardduel_transport::{FrameReader, FrameSender, TcpTransport, Transport};
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const WAIT: Duration = Duration::from_secs(3);

// =========================================================================
// Helpers
// =========================================================================

struct MemoryDecks;

impl DeckSource for MemoryDecks {
    fn load(&self, path: &str) -> Result<String, ClientError> {
        match path {
            "stompy.txt" => Ok("4 Forest\n2 Llanowar Elves\n".into()),
            _ => Err(ClientError::DeckLoad { path: path.into() }),
        }
    }
}

/// The server end of one client connection.
struct FakeServer {
    reader: FrameReader<OwnedReadHalf>,
    sender: FrameSender,
}

impl FakeServer {
    fn send(&self, message: ServerMessage) {
        self.sender.send(&message.to_payload().unwrap()).unwrap();
    }

    async fn recv(&mut self) -> Command {
        let frame = tokio::time::timeout(WAIT, self.reader.next_frame())
            .await
            .expect("timed out waiting for a command")
            .expect("client connection ended");
        Command::from_payload(&frame).unwrap()
    }
}

/// The test's side of a running client.
struct Console {
    lines: mpsc::UnboundedSender<String>,
    display: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<Result<(), ClientError>>,
}

impl Console {
    fn type_line(&self, line: &str) {
        self.lines.send(line.to_string()).unwrap();
    }

    /// Reads display lines until one satisfies `pred`, returning it.
    async fn wait_for(&mut self, pred: impl Fn(&str) -> bool) -> String {
        loop {
            let line = tokio::time::timeout(WAIT, self.display.recv())
                .await
                .expect("timed out waiting for display line")
                .expect("display closed");
            if pred(&line) {
                return line;
            }
        }
    }

    async fn finished(self) -> Result<(), ClientError> {
        tokio::time::timeout(WAIT, self.task)
            .await
            .expect("client should stop")
            .expect("client task should not panic")
    }
}

async fn start() -> (FakeServer, Console) {
    let mut transport = TcpTransport::bind("127.0.0.1:0").await.unwrap();
    let addr = transport.local_addr().unwrap().to_string();

    let accept = tokio::spawn(async move { transport.accept().await.unwrap() });
    let client = DuelClient::connect(&addr, MemoryDecks).await.unwrap();
    let (reader, sender) = accept.await.unwrap().into_parts();

    let (lines, line_rx) = mpsc::unbounded_channel();
    let (display_tx, display) = mpsc::unbounded_channel();
    let task = tokio::spawn(client.run(line_rx, display_tx));

    (
        FakeServer { reader, sender },
        Console {
            lines,
            display,
            task,
        },
    )
}

fn seat(id: u8) -> ServerMessage {
    ServerMessage::PlayerInfo(PlayerInfo {
        player_id: PlayerId(id),
        hand_cards: vec![Card::new(CardId(0), "Forest")],
    })
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_client_holds_commands_until_priority() {
    let (mut server, mut console) = start().await;

    server.send(ServerMessage::text("Waiting for opponent to connect"));
    console
        .wait_for(|l| l == "Server: Waiting for opponent to connect")
        .await;

    console.type_line("pass");
    let line = console.wait_for(|_| true).await;
    assert!(line.contains("you do not have priority"), "{line}");

    server.send(seat(0));
    server.send(ServerMessage::text("You have priority"));
    console.wait_for(|l| l == "Server: You have priority").await;

    console.type_line("pass");
    console.wait_for(|l| l.starts_with("Command sent: ")).await;

    // The first pass never reached the server.
    assert_eq!(server.recv().await.code, CommandCode::PassPriority);

    console.type_line("quit");
    assert_eq!(server.recv().await.code, CommandCode::Quit);
    console.finished().await.unwrap();
}

#[tokio::test]
async fn test_client_unknown_command_is_reported_locally() {
    let (_server, mut console) = start().await;

    console.type_line("dance");

    assert_eq!(console.wait_for(|_| true).await, "Unknown command: dance");
}

#[tokio::test]
async fn test_client_upload_sends_deck_text() {
    let (mut server, mut console) = start().await;
    server.send(seat(1));
    server.send(ServerMessage::text("You have priority"));
    console.wait_for(|l| l == "Server: You have priority").await;

    console.type_line("upload missing.txt");
    console
        .wait_for(|l| l == "Failed to load deck from: missing.txt")
        .await;

    console.type_line("upload stompy.txt");
    console.wait_for(|l| l == "Deck loaded successfully").await;

    let cmd = server.recv().await;
    assert_eq!(cmd.code, CommandCode::UploadDeck);
    assert_eq!(cmd.target, "4 Forest\n2 Llanowar Elves\n");
}

#[tokio::test]
async fn test_client_state_broadcast_revokes_priority() {
    let (mut server, mut console) = start().await;
    server.send(seat(1));
    server.send(ServerMessage::text("You have priority"));
    server.send(ServerMessage::State(PublicState {
        turn: PlayerId(0),
        priority: PlayerId(0),
        life_points: [20, 20],
    }));
    console.wait_for(|l| l.contains("life_points")).await;

    console.type_line("pass");
    let line = console.wait_for(|_| true).await;
    assert!(line.contains("you do not have priority"), "{line}");

    console.type_line("resign");
    assert_eq!(server.recv().await.code, CommandCode::Resign);
}

#[tokio::test]
async fn test_client_server_close_reports_disconnect() {
    let (server, mut console) = start().await;

    server.sender.close();

    console.wait_for(|l| l == "Disconnected from server").await;
    console.finished().await.unwrap();
}

#[tokio::test]
async fn test_client_closed_console_sends_quit() {
    let (mut server, console) = start().await;
    let Console { lines, display, task } = console;

    drop(lines);

    assert_eq!(server.recv().await.code, CommandCode::Quit);
    drop(display);
    tokio::time::timeout(WAIT, task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
