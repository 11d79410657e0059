//! Native Messaging Frame Codec
//!
//! Each frame is a 4-byte native-endian length followed by UTF-8 JSON.

use crate::error::{BridgeError, BridgeResult};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest message a native host may send back (browser-imposed)
pub const MAX_INBOUND_MESSAGE: usize = 1024 * 1024;

/// Encode a message into a length-prefixed frame
pub fn encode_message<T: Serialize>(message: &T) -> BridgeResult<Vec<u8>> {
    let body = serde_json::to_vec(message)?;
    let len = u32::try_from(body.len())
        .map_err(|_| BridgeError::MessageTooLarge(body.len(), u32::MAX as usize))?;

    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&len.to_ne_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Write one frame and flush
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> BridgeResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let frame = encode_message(message)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` on EOF at a frame boundary. EOF anywhere else is a
/// protocol error.
pub async fn read_message<R>(reader: &mut R, limit: usize) -> BridgeResult<Option<Value>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(BridgeError::Protocol(format!(
                "truncated frame header ({} of 4 bytes)",
                filled
            )));
        }
        filled += n;
    }

    let len = u32::from_ne_bytes(header) as usize;
    if len > limit {
        return Err(BridgeError::MessageTooLarge(len, limit));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            BridgeError::Protocol(format!("truncated frame body (expected {} bytes)", len))
        } else {
            BridgeError::Io(e)
        }
    })?;

    Ok(Some(serde_json::from_slice(&body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::io::Builder;

    #[test]
    fn test_encode_prefixes_length() {
        let frame = encode_message(&json!({"action": "lookup"})).unwrap();
        let body = br#"{"action":"lookup"}"#;
        assert_eq!(&frame[..4], &(body.len() as u32).to_ne_bytes());
        assert_eq!(&frame[4..], body);
    }

    #[tokio::test]
    async fn test_read_frame_then_eof() {
        let frame = encode_message(&json!({"success": true})).unwrap();
        let mut reader = Builder::new().read(&frame).build();

        let msg = read_message(&mut reader, MAX_INBOUND_MESSAGE).await.unwrap();
        assert_eq!(msg, Some(json!({"success": true})));

        let eof = read_message(&mut reader, MAX_INBOUND_MESSAGE).await.unwrap();
        assert!(eof.is_none());
    }

    #[tokio::test]
    async fn test_read_split_header() {
        let frame = encode_message(&json!({"a": 1})).unwrap();
        let mut reader = Builder::new()
            .read(&frame[..2])
            .read(&frame[2..])
            .build();

        let msg = read_message(&mut reader, MAX_INBOUND_MESSAGE).await.unwrap();
        assert_eq!(msg, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_read_rejects_oversized_frame() {
        let header = (64u32).to_ne_bytes();
        let mut reader = Builder::new().read(&header).build();

        let err = read_message(&mut reader, 16).await.unwrap_err();
        assert!(matches!(err, BridgeError::MessageTooLarge(64, 16)));
    }

    #[tokio::test]
    async fn test_read_truncated_body() {
        let frame = encode_message(&json!({"word": "serendipity"})).unwrap();
        let mut reader = Builder::new().read(&frame[..frame.len() - 3]).build();

        let err = read_message(&mut reader, MAX_INBOUND_MESSAGE).await.unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_write_message_frames_json() {
        let msg = json!({"action": "lookup", "word": "serendipity"});
        let frame = encode_message(&msg).unwrap();
        let mut writer = Builder::new().write(&frame).build();

        write_message(&mut writer, &msg).await.unwrap();
    }
}
