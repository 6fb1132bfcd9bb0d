mod endpoint;
mod response;

pub use self::{endpoint::ProxyEndpoint, response::IpInfo};

use crate::{
    config::ProxyConfig,
    error::{Error, Result},
};
use reqwest::{Client, Proxy, header::USER_AGENT};
use std::{io::Write, time::Duration};

/// IP-echo endpoint that also reports geolocation.
pub const GEO_TARGET: &str = "https://ipinfo.io/json";

/// IP-echo endpoint reporting only the origin address.
pub const PLAIN_TARGET: &str = "https://httpbin.org/ip";

/// A desktop Chrome user agent; bare library agents get blocked by some targets.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request knobs, independent of the proxy itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOptions {
    pub target: String,
    pub user_agent: String,
    /// Whole-request timeout. `None` keeps the HTTP stack defaults.
    pub timeout: Option<Duration>,
    /// Skip TLS certificate verification. Off unless explicitly requested.
    pub insecure: bool,
}

impl RequestOptions {
    pub fn new<T: Into<String>>(target: T) -> Self {
        Self {
            target: target.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            insecure: false,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(GEO_TARGET)
    }
}

/// An HTTP client wired to send everything through one forward proxy.
#[derive(Clone, Debug)]
pub struct IpCheck {
    client: Client,
    options: RequestOptions,
}

impl IpCheck {
    pub fn new(endpoint: &ProxyEndpoint, options: RequestOptions) -> Result<Self> {
        let proxy = Proxy::all(endpoint.url()).map_err(|e| Error::Config(format!("Invalid proxy {endpoint}: {e}")))?;

        let mut builder = Client::builder().proxy(proxy);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if options.insecure {
            log::warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        log::debug!("proxy {endpoint}");

        Ok(Self {
            client: builder.build()?,
            options,
        })
    }

    /// Sends a single `GET` to the target. No retries.
    pub async fn fetch(&self) -> Result<IpInfo> {
        log::debug!("GET {}", self.options.target);
        let resp = self
            .client
            .get(&self.options.target)
            .header(USER_AGENT, &self.options.user_agent)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        log::debug!("{} -> {status}, {} bytes", self.options.target, body.len());

        if !status.is_success() {
            // lossy: invalid UTF-8 shows up as U+FFFD in the message
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        IpInfo::from_slice(&body)
    }
}

/// Prints the proxy identity, performs the request, and prints the response fields.
pub async fn run<W>(config: &ProxyConfig, options: &RequestOptions, out: &mut W) -> Result<IpInfo>
where
    W: Write + ?Sized,
{
    let endpoint = config.endpoint();

    writeln!(out, "Proxy:    {endpoint}")?;
    match endpoint.auth() {
        Some(key) => writeln!(out, "Username: {}", key.username)?,
        None => writeln!(out, "Username: (none, IP whitelist)")?,
    }
    // location and session ride in the user-info, so only report what is sent
    if let Some(cred) = config.credential() {
        for (key, value) in cred.geo().selectors() {
            let label = match key {
                "continent" => "Continent:",
                "country" => "Country:",
                "state" => "State:",
                "city" => "City:",
                _ => "ASN:",
            };
            writeln!(out, "{label:<9} {value}")?;
        }
        if let Some(session) = cred.session() {
            writeln!(out, "{:<9} {} ({} min)", "Session:", session.id(), session.minutes())?;
        }
    }
    writeln!(out, "Target:   {}", options.target)?;
    writeln!(out)?;

    let info = IpCheck::new(&endpoint, options.clone())?.fetch().await?;
    info.write_summary(out)?;
    Ok(info)
}
