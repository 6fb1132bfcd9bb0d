use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::io::Write;

/// The JSON object returned by an IP-echo service.
///
/// Only a handful of keys are read; the rest are kept but never interpreted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IpInfo {
    fields: Map<String, Value>,
}

impl IpInfo {
    /// Parses a response body. Anything but a JSON object is a decode error.
    pub fn from_body(body: &str) -> Result<Self> {
        Self::from_slice(body.as_bytes())
    }

    /// Like [`IpInfo::from_body`] for raw bytes. The body kept in a decode
    /// error is converted lossily, so invalid UTF-8 shows up as U+FFFD.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Map<String, Value>>(body) {
            Ok(fields) => Ok(Self { fields }),
            Err(source) => Err(Error::Decode {
                source,
                body: String::from_utf8_lossy(body).into_owned(),
            }),
        }
    }

    /// A field as text. Strings come back unquoted, other values as JSON.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// `ip` from ipinfo-style services, `origin` from httpbin-style ones.
    pub fn ip(&self) -> Option<String> {
        self.get("ip").or_else(|| self.get("origin"))
    }

    pub fn country(&self) -> Option<String> {
        self.get("country")
    }

    pub fn region(&self) -> Option<String> {
        self.get("region")
    }

    pub fn city(&self) -> Option<String> {
        self.get("city")
    }

    pub fn write_summary<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        let rows = [
            ("IP:", self.ip()),
            ("Country:", self.country()),
            ("Region:", self.region()),
            ("City:", self.city()),
        ];
        writeln!(out, "[OK] Response:")?;
        for (label, value) in rows {
            writeln!(out, "   {label:<8} {}", value.unwrap_or_default())?;
        }
        Ok(())
    }
}
