use crate::error::Result;
use rand::{Rng, distr::Alphanumeric};
use std::ops::RangeInclusive;

/// Lifetimes the proxy accepts for a sticky session, in minutes.
pub const SESSION_MINUTES: RangeInclusive<u32> = 1..=90;

pub const DEFAULT_SESSION_MINUTES: u32 = 10;

const RANDOM_ID_LEN: usize = 6;

/// Keeps the same egress IP for `minutes` across every request carrying `id`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StickySession {
    id: String,
    minutes: u32,
}

impl StickySession {
    pub fn new<I: Into<String>>(id: I, minutes: u32) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!("Invalid session id {id:?}: expected ASCII letters or digits").into());
        }
        if !SESSION_MINUTES.contains(&minutes) {
            let err = format!("Session duration {minutes} out of range {SESSION_MINUTES:?} minutes");
            return Err(err.into());
        }
        Ok(Self { id, minutes })
    }

    /// A fresh session with a random lowercase id.
    pub fn random(minutes: u32) -> Result<Self> {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_ID_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        Self::new(id, minutes)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl std::fmt::Display for StickySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sessid-{}-sesstime-{}", self.id, self.minutes)
    }
}
