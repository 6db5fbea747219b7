//! Per-connection reader task.
//!
//! Each seated player gets one task running [`read_loop`]. It pulls frames
//! off the socket and forwards them to the match actor until either side
//! ends the connection:
//!
//! - the peer closes, resets, or breaks framing → the read fails
//! - the server closes the connection → the writer stops and
//!   `FrameSender::closed` resolves
//!
//! Either way the actor hears exactly one `Disconnected` from this task.

use cardduel_protocol::PlayerId;
use cardduel_transport::{FrameReader, FrameSender, TransportError};
use tokio::io::AsyncRead;

use crate::actor::MatchHandle;

/// Forwards `player`'s frames to the match until the connection ends.
pub(crate) async fn read_loop<R>(
    player: PlayerId,
    mut reader: FrameReader<R>,
    sender: FrameSender,
    handle: MatchHandle,
) where
    R: AsyncRead + Unpin,
{
    let conn_id = sender.id();
    tracing::debug!(player_id = %player, %conn_id, "reader started");

    loop {
        tokio::select! {
            frame = reader.next_frame() => match frame {
                Ok(payload) => {
                    if !handle.frame(player, payload) {
                        break;
                    }
                }
                Err(TransportError::FrameTooLarge { len, max }) => {
                    tracing::warn!(player_id = %player, len, max, "oversized frame, closing");
                    break;
                }
                Err(e) => {
                    tracing::debug!(player_id = %player, error = %e, "read ended");
                    break;
                }
            },
            () = sender.closed() => {
                tracing::debug!(player_id = %player, %conn_id, "connection closed by server");
                break;
            }
        }
    }

    handle.disconnected(player);
}
