use super::repair::repair_line;
use crate::types::Bullet;
use serde::Deserialize;

/// Marker identifying a line that carries a bullet record.
pub const KEY_MARKER: &str = "\"key\":";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyRecord {
    key: String,
}

/// Bullets recovered from one backend reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub bullets: Vec<Bullet>,
    pub repaired_lossy: usize,
}

impl ParsedReply {
    pub fn rendered(&self) -> Vec<String> {
        self.bullets.iter().map(Bullet::render).collect()
    }
}

/// Extract bullets from the raw reply for one chunk.
///
/// Only lines containing `"key":` are considered. Each is repaired and parsed
/// as a single-key record; when that still fails, the text after the marker
/// is kept as a [`Bullet::Repaired`] instead of being dropped.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let mut parsed = ParsedReply::default();
    for line in raw.lines().filter(|line| line.contains(KEY_MARKER)) {
        let bullet = parse_line(line);
        if bullet.is_repaired() {
            parsed.repaired_lossy += 1;
        }
        parsed.bullets.push(bullet);
    }
    parsed
}

fn parse_line(line: &str) -> Bullet {
    let repaired = repair_line(line);
    if let Ok(record) = serde_json::from_str::<KeyRecord>(&repaired) {
        return Bullet::Parsed(record.key);
    }

    let tail = repaired
        .find(KEY_MARKER)
        .map(|at| &repaired[at + KEY_MARKER.len()..])
        .unwrap_or_default();
    Bullet::Repaired(tail.trim().to_string())
}
