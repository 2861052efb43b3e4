use crate::errors::ProbeError;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Appends a Minecraft-style varint (LEB128 over the two's-complement
/// bits, so negative values take the full five bytes).
pub(crate) fn put_varint(buf: &mut BytesMut, value: i32) {
    let mut raw = value as u32;
    loop {
        let mut byte = (raw & 0x7F) as u8;
        raw >>= 7;
        if raw != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if raw == 0 {
            break;
        }
    }
}

/// Appends a varint-length-prefixed UTF-8 string.
pub(crate) fn put_string(buf: &mut BytesMut, value: &str) {
    put_varint(buf, value.len() as i32);
    buf.put_slice(value.as_bytes());
}

/// Wraps a packet payload in the outer length-prefixed frame.
pub(crate) fn frame_packet(payload: &[u8]) -> BytesMut {
    let mut framed = BytesMut::with_capacity(payload.len() + 5);
    put_varint(&mut framed, payload.len() as i32);
    framed.put_slice(payload);
    framed
}

pub(crate) async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, ProbeError> {
    let mut value: u32 = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 35 {
            return Err(ProbeError::Protocol("varint longer than five bytes".to_string()));
        }
    }
    Ok(value as i32)
}
