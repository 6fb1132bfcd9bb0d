/// Proxy network the account is billed against. Each one listens on its own
/// gateway port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProxyProduct {
    #[default]
    Residential,
    Mobile,
    Datacenter,
    Isp,
}

impl ProxyProduct {
    pub fn default_port(self) -> u16 {
        match self {
            ProxyProduct::Residential => 9999,
            ProxyProduct::Mobile => 5555,
            ProxyProduct::Datacenter => 7777,
            ProxyProduct::Isp => 6666,
        }
    }
}

impl std::fmt::Display for ProxyProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProxyProduct::Residential => "residential",
            ProxyProduct::Mobile => "mobile",
            ProxyProduct::Datacenter => "datacenter",
            ProxyProduct::Isp => "isp",
        };
        write!(f, "{s}")
    }
}

/// How the client talks to the proxy itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProxyScheme {
    #[default]
    Http,
    Https,
    /// SOCKS5 with hostname resolution on the proxy side.
    Socks5h,
}

impl ProxyScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyScheme::Http => "http",
            ProxyScheme::Https => "https",
            ProxyScheme::Socks5h => "socks5h",
        }
    }
}

impl std::fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
