use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tokio::{
    fs::File,
    io::{self, AsyncWrite, AsyncWriteExt, BufWriter},
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
};
use tracing::debug;

use common::protocol::TickSnapshot;

// ============================================================================
// Snapshot Encoding
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    // One JSON object per line
    #[default]
    Json,
    // u32 little-endian length prefix followed by the bincode payload
    Bincode,
}

pub fn encode_snapshot(snapshot: &TickSnapshot, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => {
            let mut bytes = serde_json::to_vec(snapshot).context("failed to encode snapshot as json")?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        Format::Bincode => encode_bincode(snapshot),
    }
}

#[cfg(feature = "bincode")]
fn encode_bincode(snapshot: &TickSnapshot) -> Result<Vec<u8>> {
    let payload = bincode::encode_to_vec(snapshot, bincode::config::standard())
        .context("failed to encode snapshot as bincode")?;
    let len = u32::try_from(payload.len()).context("snapshot too large for length prefix")?;
    let mut bytes = Vec::with_capacity(payload.len() + 4);
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

#[cfg(not(feature = "bincode"))]
fn encode_bincode(_snapshot: &TickSnapshot) -> Result<Vec<u8>> {
    anyhow::bail!("runner was built without the bincode feature")
}

// ============================================================================
// Snapshot Writer Task
// ============================================================================

// Hands a tick's snapshots to the writer task. Returns false once the writer
// has gone away; the remaining snapshots are dropped.
pub fn forward_snapshots(
    to_writer: &UnboundedSender<TickSnapshot>,
    snapshots: impl IntoIterator<Item = TickSnapshot>,
) -> bool {
    snapshots.into_iter().all(|snapshot| to_writer.send(snapshot).is_ok())
}

// Writes snapshots until every sender is dropped. `None` means stdout.
pub async fn snapshot_writer_task(
    output: Option<PathBuf>,
    format: Format,
    mut from_sim: UnboundedReceiver<TickSnapshot>,
) -> Result<()> {
    let sink: Box<dyn AsyncWrite + Unpin + Send> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .await
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(sink);

    let mut written: u64 = 0;
    while let Some(snapshot) = from_sim.recv().await {
        let bytes = encode_snapshot(&snapshot, format)?;
        writer.write_all(&bytes).await.context("failed to write snapshot")?;
        written += 1;
    }
    writer.flush().await.context("failed to flush snapshots")?;

    debug!("snapshot writer done after {written} snapshots");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::protocol::{AlarmStatus, PlayerState, Rect};

    fn snapshot() -> TickSnapshot {
        TickSnapshot {
            tick: 3,
            elapsed_secs: 0.75,
            player: PlayerState {
                hitbox: Rect::new(10.0, 20.0, 28.0, 36.0),
                carrying_objective: false,
                hold_progress: 0.0,
            },
            sentries: Vec::new(),
            alarm: AlarmStatus::default(),
            time_remaining: None,
            events: Vec::new(),
            outcome: None,
        }
    }

    #[test]
    fn json_is_one_line_per_snapshot() {
        let bytes = encode_snapshot(&snapshot(), Format::Json).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["tick"], 3);
    }

    #[test]
    fn forwarding_reports_a_closed_writer() {
        let (to_writer, mut from_sim) = tokio::sync::mpsc::unbounded_channel();
        assert!(forward_snapshots(&to_writer, vec![snapshot(), snapshot()]));
        assert_eq!(from_sim.try_recv().map(|s| s.tick), Ok(3));
        assert!(from_sim.try_recv().is_ok());

        drop(from_sim);
        assert!(!forward_snapshots(&to_writer, vec![snapshot()]));
        // nothing to send is not a failure
        assert!(forward_snapshots(&to_writer, Vec::new()));
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn bincode_frames_carry_their_length() {
        let bytes = encode_snapshot(&snapshot(), Format::Bincode).unwrap();
        let len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(len, bytes.len() - 4);

        let (decoded, _): (TickSnapshot, usize) =
            bincode::decode_from_slice(&bytes[4..], bincode::config::standard()).unwrap();
        assert_eq!(decoded.tick, 3);
    }
}
