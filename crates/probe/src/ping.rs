use crate::errors::ProbeError;
use crate::models::{resolve, Probe, FATAL_NETWORK_MARKERS};
use crate::wire;
use bytes::{BufMut, BytesMut};
use mcpulse_models::{Motd, PingPlayers, PingRecord, PingServer, ProbeKind};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Protocol number sent in the handshake; -1 asks the server to answer
/// with its own preferred version.
const HANDSHAKE_PROTOCOL: i32 = -1;
const NEXT_STATE_STATUS: i32 = 1;
const STATUS_PACKET_ID: i32 = 0x00;
/// Upper bound on the JSON status payload; anything bigger is garbage.
const MAX_STATUS_LEN: i32 = 1024 * 1024;

/// TCP server-list-ping probe: handshake, status request, one JSON payload
/// back. The configured timeout bounds the dial and the response exchange
/// separately.
pub struct PingProbe {
    timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct PongPayload {
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    players: PongPlayers,
    #[serde(default)]
    version: PongVersion,
    #[serde(default)]
    favicon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PongPlayers {
    #[serde(default)]
    max: i64,
    #[serde(default)]
    online: i64,
}

#[derive(Debug, Default, Deserialize)]
struct PongVersion {
    #[serde(default)]
    name: String,
    #[serde(default)]
    protocol: i64,
}

impl PingProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn exchange(&self, addr: &str) -> Result<PongPayload, ProbeError> {
        let target = resolve(addr).await?;

        // resolve() has already validated the host:port shape
        let (host, port) = addr.rsplit_once(':').unwrap_or((addr, "25565"));
        let port: u16 = port.parse().unwrap_or(25565);

        let mut stream = match timeout(self.timeout, TcpStream::connect(target)).await {
            Ok(stream) => stream?,
            Err(_) => return Err(ProbeError::Timeout),
        };

        let mut handshake = BytesMut::new();
        wire::put_varint(&mut handshake, STATUS_PACKET_ID);
        wire::put_varint(&mut handshake, HANDSHAKE_PROTOCOL);
        wire::put_string(&mut handshake, host);
        handshake.put_u16(port);
        wire::put_varint(&mut handshake, NEXT_STATE_STATUS);

        let mut status_request = BytesMut::new();
        wire::put_varint(&mut status_request, STATUS_PACKET_ID);

        let mut request = wire::frame_packet(&handshake);
        request.extend_from_slice(&wire::frame_packet(&status_request));

        let json = match timeout(self.timeout, read_status(&mut stream, &request)).await {
            Ok(json) => json?,
            Err(_) => return Err(ProbeError::Timeout),
        };

        Ok(serde_json::from_str(&json)?)
    }

    fn build_record(addr: &str, pong: PongPayload) -> PingRecord {
        let mut record = PingRecord {
            players: PingPlayers {
                max: pong.players.max,
                now: pong.players.online,
            },
            server: PingServer {
                name: pong.version.name,
                protocol: pong.version.protocol,
            },
            favicon: pong.favicon,
            ..PingRecord::default()
        };

        if let Some(description) = pong.description {
            let motd = Motd::parse(&description);
            if motd.is_unknown() {
                tracing::warn!("strange motd on server {}: {}", addr, description);
            }
            record.motd = motd.plain_text();
            record.motd_extra = motd.extra_value();
            record.motd_formatted = motd.formatted_html();
        }

        record
    }
}

async fn read_status(stream: &mut TcpStream, request: &[u8]) -> Result<String, ProbeError> {
    stream.write_all(request).await?;

    let _frame_len = wire::read_varint(stream).await?;
    let packet_id = wire::read_varint(stream).await?;
    if packet_id != STATUS_PACKET_ID {
        return Err(ProbeError::Protocol(format!(
            "unexpected status packet id {}",
            packet_id
        )));
    }

    let len = wire::read_varint(stream).await?;
    if !(0..=MAX_STATUS_LEN).contains(&len) {
        return Err(ProbeError::Protocol(format!("status length {} out of range", len)));
    }

    let mut payload = vec![0u8; len as usize];
    stream.read_exact(&mut payload).await?;

    String::from_utf8(payload)
        .map_err(|_| ProbeError::Protocol("status payload is not utf-8".to_string()))
}

#[async_trait::async_trait]
impl Probe for PingProbe {
    type Record = PingRecord;

    fn kind(&self) -> ProbeKind {
        ProbeKind::Ping
    }

    fn fatal_markers(&self) -> &'static [&'static str] {
        FATAL_NETWORK_MARKERS
    }

    async fn probe(&self, addr: &str) -> Result<PingRecord, ProbeError> {
        let pong = self.exchange(addr).await?;
        Ok(Self::build_record(addr, pong))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> PongPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn record_from_structured_description() {
        let pong = payload(json!({
            "description": { "extra": [
                { "text": "Welcome ", "color": "gold" },
                { "text": "home", "bold": true }
            ]},
            "players": { "max": 20, "online": 3 },
            "version": { "name": "1.8", "protocol": 47 },
            "favicon": "data:image/png;base64,AAAA"
        }));

        let record = PingProbe::build_record("host:25565", pong);
        assert_eq!(record.motd, "Welcome home");
        assert!(record.motd_formatted.as_deref().unwrap().contains("color: gold"));
        assert!(record.motd_extra.is_some());
        assert_eq!(record.players, PingPlayers { max: 20, now: 3 });
        assert_eq!(record.server.name, "1.8");
        assert_eq!(record.server.protocol, 47);
        assert_eq!(record.favicon.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn record_from_bare_string_description() {
        let pong = payload(json!({
            "description": "A Minecraft Server",
            "players": { "max": 10, "online": 0 },
            "version": { "name": "1.20.4", "protocol": 765 }
        }));

        let record = PingProbe::build_record("host:25565", pong);
        assert_eq!(record.motd, "A Minecraft Server");
        assert_eq!(record.motd_formatted, None);
        assert_eq!(record.motd_extra, None);
    }

    #[test]
    fn unknown_description_yields_empty_motd() {
        let pong = payload(json!({
            "description": 42,
            "players": { "max": 10, "online": 0 },
            "version": { "name": "1.8", "protocol": 47 }
        }));

        let record = PingProbe::build_record("host:25565", pong);
        assert_eq!(record.motd, "");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let pong = payload(json!({}));
        let record = PingProbe::build_record("host:25565", pong);
        assert_eq!(record.players, PingPlayers::default());
        assert_eq!(record.server, PingServer::default());
        assert_eq!(record.favicon, None);
    }
}
