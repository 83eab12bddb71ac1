use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const OBJECT_ID_LEN: usize = 12;

static OBJECT_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Twelve-byte storage identifier rendered as 24 lowercase hex characters.
///
/// Layout: 4-byte big-endian creation second, 5 random bytes fixed per
/// identifier, 3-byte rolling counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let random: [u8; 5] = rand::rng().random();
        let counter = OBJECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn parse(raw: &str) -> Result<Self, ObjectIdError> {
        let raw = raw.trim();
        if raw.len() != OBJECT_ID_LEN * 2 {
            return Err(ObjectIdError::Length(raw.len()));
        }

        let decoded = hex::decode(raw).map_err(|_| ObjectIdError::NotHex)?;
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectIdError {
    #[error("expected 24 hexadecimal characters, got {0}")]
    Length(usize),
    #[error("identifier contains non-hexadecimal characters")]
    NotHex,
}
