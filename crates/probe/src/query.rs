use crate::errors::ProbeError;
use crate::models::{resolve, Probe, FATAL_NETWORK_MARKERS};
use bytes::{BufMut, BytesMut};
use mcpulse_models::{ProbeKind, QueryPlayers, QueryRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

const QUERY_MAGIC: [u8; 2] = [0xFE, 0xFD];
const PACKET_HANDSHAKE: u8 = 9;
const PACKET_STAT: u8 = 0;
/// Servers echo only the low nibble of each session byte back.
const SESSION_MASK: i32 = 0x0F0F_0F0F;
/// Bytes the full-stat response pads between the session id and the
/// key/value section.
const STAT_HEADER_PADDING: usize = 11;
/// Marker separating the key/value section from the player list.
const PLAYER_SECTION_HEADER: &[u8] = b"\x01player_\x00\x00";

static SESSION_COUNTER: AtomicI32 = AtomicI32::new(1);

fn next_session_id() -> i32 {
    SESSION_COUNTER.fetch_add(1, Ordering::Relaxed) & SESSION_MASK
}

/// UDP full-stat query probe: a challenge handshake followed by the stat
/// request carrying the challenge token.
pub struct QueryProbe {
    timeout: Duration,
}

#[derive(Debug, Default)]
struct FullStat {
    kv: HashMap<String, String>,
    players: Vec<String>,
}

impl QueryProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn exchange(&self, addr: &str) -> Result<FullStat, ProbeError> {
        let target = resolve(addr).await?;

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(target).await?;

        let session = next_session_id();

        let mut handshake = BytesMut::with_capacity(7);
        handshake.put_slice(&QUERY_MAGIC);
        handshake.put_u8(PACKET_HANDSHAKE);
        handshake.put_i32(session);
        socket.send(&handshake).await?;

        let mut buf = vec![0u8; 64];
        let received = match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Err(ProbeError::Timeout),
        };
        let challenge = parse_challenge(&buf[..received])?;

        let mut request = BytesMut::with_capacity(15);
        request.put_slice(&QUERY_MAGIC);
        request.put_u8(PACKET_STAT);
        request.put_i32(session);
        request.put_i32(challenge);
        // four zero bytes upgrade the basic stat to a full stat
        request.put_slice(&[0, 0, 0, 0]);
        socket.send(&request).await?;

        let mut buf = vec![0u8; 65_535];
        let received = match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Err(ProbeError::Timeout),
        };

        parse_full_stat(&buf[..received])
    }

    fn build_record(stat: FullStat) -> QueryRecord {
        let mut kv = stat.kv;
        let mut take = |key: &str| kv.remove(key).unwrap_or_default();

        let (server_mod, plugins) = split_plugins(&take("plugins"));
        let now = take("numplayers").parse().unwrap_or_default();
        let max = take("maxplayers").parse().unwrap_or_default();

        QueryRecord {
            motd: take("hostname"),
            version: take("version"),
            game_type: take("gametype"),
            game_id: take("game_id"),
            server_mod,
            map: take("map"),
            plugins,
            players: QueryPlayers {
                max,
                now,
                list: stat.players,
            },
            ..QueryRecord::default()
        }
    }
}

fn parse_challenge(resp: &[u8]) -> Result<i32, ProbeError> {
    if resp.len() < 6 || resp[0] != PACKET_HANDSHAKE {
        return Err(ProbeError::Protocol("malformed challenge response".to_string()));
    }

    let token = &resp[5..];
    let end = token.iter().position(|&b| b == 0).unwrap_or(token.len());
    let text = std::str::from_utf8(&token[..end])
        .map_err(|_| ProbeError::Protocol("challenge token is not ascii".to_string()))?;

    text.trim()
        .parse()
        .map_err(|_| ProbeError::Protocol(format!("bad challenge token {:?}", text)))
}

fn parse_full_stat(resp: &[u8]) -> Result<FullStat, ProbeError> {
    if resp.len() < 5 + STAT_HEADER_PADDING || resp[0] != PACKET_STAT {
        return Err(ProbeError::Protocol("malformed stat response".to_string()));
    }

    let mut rest = &resp[5 + STAT_HEADER_PADDING..];

    let mut kv = HashMap::new();
    loop {
        let key = take_cstring(&mut rest)?;
        if key.is_empty() {
            break;
        }
        let value = take_cstring(&mut rest)?;
        kv.insert(key, value);
    }

    if let Some(tail) = rest.strip_prefix(PLAYER_SECTION_HEADER) {
        rest = tail;
    }

    let mut players = Vec::new();
    while !rest.is_empty() {
        let name = take_cstring(&mut rest)?;
        if name.is_empty() {
            break;
        }
        players.push(name);
    }

    Ok(FullStat { kv, players })
}

fn take_cstring(rest: &mut &[u8]) -> Result<String, ProbeError> {
    let end = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ProbeError::Protocol("unterminated string in stat response".to_string()))?;
    let (raw, tail) = rest.split_at(end);
    *rest = &tail[1..];
    Ok(String::from_utf8_lossy(raw).into_owned())
}

/// The `plugins` value packs the server mod and its plugin list as
/// `<mod>: <plugin>; <plugin>`; vanilla servers send an empty string.
fn split_plugins(raw: &str) -> (String, Vec<String>) {
    if raw.is_empty() {
        return (String::new(), Vec::new());
    }

    match raw.split_once(':') {
        Some((server_mod, list)) => {
            let plugins = list
                .split(';')
                .map(|plugin| plugin.trim().to_string())
                .filter(|plugin| !plugin.is_empty())
                .collect();
            (server_mod.trim().to_string(), plugins)
        }
        None => (raw.trim().to_string(), Vec::new()),
    }
}

#[async_trait::async_trait]
impl Probe for QueryProbe {
    type Record = QueryRecord;

    fn kind(&self) -> ProbeKind {
        ProbeKind::Query
    }

    fn fatal_markers(&self) -> &'static [&'static str] {
        FATAL_NETWORK_MARKERS
    }

    async fn probe(&self, addr: &str) -> Result<QueryRecord, ProbeError> {
        let stat = self.exchange(addr).await?;
        Ok(Self::build_record(stat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_token_parses_from_ascii() {
        let mut resp = vec![PACKET_HANDSHAKE, 0, 0, 0, 1];
        resp.extend_from_slice(b"9513307\0");
        assert_eq!(parse_challenge(&resp).unwrap(), 9_513_307);
    }

    #[test]
    fn truncated_challenge_is_rejected() {
        assert!(parse_challenge(&[PACKET_HANDSHAKE, 0, 0]).is_err());
        assert!(parse_challenge(b"\x00\x00\x00\x00\x01junk\0").is_err());
    }

    fn stat_fixture() -> Vec<u8> {
        let mut resp = vec![PACKET_STAT, 0, 0, 0, 1];
        resp.extend_from_slice(&[0u8; STAT_HEADER_PADDING]);
        resp.extend_from_slice(
            b"hostname\0A Minecraft Server\0\
              gametype\0SMP\0\
              game_id\0MINECRAFT\0\
              version\01.8.8\0\
              plugins\0CraftBukkit on Bukkit 1.8.8-R0.1: WorldEdit 6.1; Essentials 2.x\0\
              map\0world\0\
              numplayers\02\0\
              maxplayers\020\0\
              hostport\025565\0\
              hostip\0127.0.0.1\0\0",
        );
        resp.extend_from_slice(PLAYER_SECTION_HEADER);
        resp.extend_from_slice(b"alice\0bob\0\0");
        resp
    }

    #[test]
    fn full_stat_parses_sections() {
        let stat = parse_full_stat(&stat_fixture()).unwrap();
        assert_eq!(stat.kv.get("hostname").unwrap(), "A Minecraft Server");
        assert_eq!(stat.kv.get("map").unwrap(), "world");
        assert_eq!(stat.players, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn record_from_full_stat() {
        let stat = parse_full_stat(&stat_fixture()).unwrap();
        let record = QueryProbe::build_record(stat);

        assert_eq!(record.motd, "A Minecraft Server");
        assert_eq!(record.version, "1.8.8");
        assert_eq!(record.game_type, "SMP");
        assert_eq!(record.game_id, "MINECRAFT");
        assert_eq!(record.map, "world");
        assert_eq!(record.server_mod, "CraftBukkit on Bukkit 1.8.8-R0.1");
        assert_eq!(record.plugins, vec!["WorldEdit 6.1".to_string(), "Essentials 2.x".to_string()]);
        assert_eq!(record.players.now, 2);
        assert_eq!(record.players.max, 20);
        assert_eq!(record.players.list, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn vanilla_servers_report_no_plugins() {
        assert_eq!(split_plugins(""), (String::new(), Vec::new()));
        assert_eq!(split_plugins("vanilla"), ("vanilla".to_string(), Vec::new()));
    }

    #[test]
    fn session_ids_respect_the_mask() {
        for _ in 0..64 {
            let session = next_session_id();
            assert_eq!(session & !SESSION_MASK, 0);
        }
    }

    #[test]
    fn malformed_stat_response_is_rejected() {
        assert!(parse_full_stat(&[PACKET_STAT, 0, 0]).is_err());
        assert!(parse_full_stat(&[9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }
}
