//! # Chunked Writes
//!
//! Streams a printer-control buffer to a resolved characteristic in
//! MTU-safe chunks.
//!
//! ## Chunk Size
//!
//! Many printer modules never negotiate an ATT MTU above their low
//! defaults, so the chunk size is a fixed conservative constant rather
//! than a per-link negotiation. 100 bytes works on every printer module
//! tested so far.
//!
//! ## Pacing
//!
//! Write-without-response gives no application-level flow control, so a
//! short fixed delay after each chunk keeps the printer's input buffer
//! from overrunning on long receipts. The last chunk needs no delay.

use std::time::Duration;

use crate::error::PrintError;

use super::gatt::{GattCharacteristic, GattSession};

/// Bytes per characteristic write.
pub const CHUNK_SIZE: usize = 100;

/// Pause between consecutive chunks.
pub const CHUNK_DELAY: Duration = Duration::from_millis(15);

/// Send `data` to the printer, in order, one chunk at a time.
///
/// Chunk writes are strictly sequential: chunk N+1 is never issued before
/// chunk N's write call has settled. Any chunk failure aborts the
/// transmission as [`PrintError::WriteFailed`]; partial data may already
/// have reached the printer, so the caller retries the whole print.
pub async fn write_chunked<S: GattSession + ?Sized>(
    session: &S,
    characteristic: &GattCharacteristic,
    data: &[u8],
) -> Result<(), PrintError> {
    let mode = characteristic
        .props
        .preferred_write_mode()
        .ok_or(PrintError::NoWritableCharacteristic)?;

    let total = data.len().div_ceil(CHUNK_SIZE);
    tracing::debug!(
        bytes = data.len(),
        chunks = total,
        ?mode,
        "starting chunked transmission"
    );

    for (index, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        session
            .write(characteristic, chunk, mode)
            .await
            .map_err(|e| PrintError::WriteFailed(e.to_string()))?;

        if index + 1 < total {
            tokio::time::sleep(CHUNK_DELAY).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::gatt::{CharacteristicProps, GattService, WriteMode};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use uuid::uuid;

    /// Records every write; optionally fails the nth one (1-based).
    #[derive(Default)]
    struct RecordingSession {
        writes: Mutex<Vec<(WriteMode, Vec<u8>)>>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl GattSession for RecordingSession {
        fn services(&self) -> Vec<GattService> {
            Vec::new()
        }

        async fn write(
            &self,
            _characteristic: &GattCharacteristic,
            chunk: &[u8],
            mode: WriteMode,
        ) -> Result<(), PrintError> {
            let mut writes = self.writes.lock().unwrap();
            if self.fail_at == Some(writes.len() + 1) {
                return Err(PrintError::Link("link reset by peer".to_string()));
            }
            writes.push((mode, chunk.to_vec()));
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), PrintError> {
            Ok(())
        }
    }

    fn target(write: bool, write_without_response: bool) -> GattCharacteristic {
        GattCharacteristic {
            service: uuid!("000018f0-0000-1000-8000-00805f9b34fb"),
            uuid: uuid!("00002af1-0000-1000-8000-00805f9b34fb"),
            props: CharacteristicProps {
                write,
                write_without_response,
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn splits_into_ordered_mtu_safe_chunks() {
        let session = RecordingSession::default();
        let data: Vec<u8> = (0..250).map(|i| (i % 251) as u8).collect();

        write_chunked(&session, &target(false, true), &data).await.unwrap();

        let writes = session.writes.lock().unwrap();
        let lengths: Vec<usize> = writes.iter().map(|(_, chunk)| chunk.len()).collect();
        assert_eq!(vec![100, 100, 50], lengths);

        // Every byte, in order, exactly once.
        let reassembled: Vec<u8> = writes.iter().flat_map(|(_, c)| c.clone()).collect();
        assert_eq!(data, reassembled);
    }

    #[tokio::test(start_paused = true)]
    async fn paces_every_chunk_except_the_last() {
        let session = RecordingSession::default();
        let data = vec![0u8; 250];
        let started = tokio::time::Instant::now();

        write_chunked(&session, &target(false, true), &data).await.unwrap();

        // Three chunks, delay after the first two only.
        assert_eq!(CHUNK_DELAY * 2, started.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn single_chunk_has_no_pacing_delay() {
        let session = RecordingSession::default();
        let started = tokio::time::Instant::now();

        write_chunked(&session, &target(true, false), &[1, 2, 3]).await.unwrap();

        assert_eq!(Duration::ZERO, started.elapsed());
        assert_eq!(1, session.writes.lock().unwrap().len());
    }

    #[tokio::test]
    async fn empty_payload_issues_no_writes() {
        let session = RecordingSession::default();
        write_chunked(&session, &target(true, false), &[]).await.unwrap();
        assert!(session.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_mode_is_chosen_once_for_the_whole_run() {
        let session = RecordingSession::default();
        write_chunked(&session, &target(true, true), &vec![0u8; 150])
            .await
            .unwrap();

        let writes = session.writes.lock().unwrap();
        assert!(writes.iter().all(|(mode, _)| *mode == WriteMode::WithoutResponse));
    }

    #[tokio::test(start_paused = true)]
    async fn chunk_failure_aborts_as_write_failed() {
        let session = RecordingSession {
            fail_at: Some(2),
            ..Default::default()
        };

        let result = write_chunked(&session, &target(false, true), &vec![0u8; 300]).await;

        assert!(matches!(result, Err(PrintError::WriteFailed(_))));
        // Chunk 3 was never attempted after chunk 2 failed.
        assert_eq!(1, session.writes.lock().unwrap().len());
    }
}
