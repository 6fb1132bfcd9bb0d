use crate::credential::{ProxyScheme, UserKey};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is in URL user-info (RFC 3986 `unreserved`).
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A forward proxy address, optionally with basic-auth credentials.
///
/// `Display` redacts the password; use [`ProxyEndpoint::url`] to get the real
/// proxy URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    scheme: ProxyScheme,
    host: String,
    port: u16,
    auth: Option<UserKey>,
}

impl ProxyEndpoint {
    pub fn new<H: Into<String>>(scheme: ProxyScheme, host: H, port: u16, auth: Option<UserKey>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            auth,
        }
    }

    pub fn scheme(&self) -> ProxyScheme {
        self.scheme
    }

    pub fn auth(&self) -> Option<&UserKey> {
        self.auth.as_ref()
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `<scheme>://[user:pass@]host:port` with the user-info percent-encoded.
    pub fn url(&self) -> String {
        match &self.auth {
            Some(key) => format!(
                "{}://{}:{}@{}",
                self.scheme,
                utf8_percent_encode(&key.username, USERINFO),
                utf8_percent_encode(&key.password, USERINFO),
                self.address()
            ),
            None => format!("{}://{}", self.scheme, self.address()),
        }
    }
}

impl std::fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.auth {
            Some(key) => write!(f, "{}://{}:****@{}", self.scheme, key.username, self.address()),
            None => write!(f, "{}://{}", self.scheme, self.address()),
        }
    }
}
