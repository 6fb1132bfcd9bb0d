mod source;

pub use self::source::{ConfigSource, EnvFile, Layered, ProcessEnv};

use crate::{
    client::ProxyEndpoint,
    credential::{GeoTarget, ProxyCredential, ProxyProduct, ProxyScheme, StickySession, UserKey},
    error::Result,
};

pub const DEFAULT_PROXY_HOST: &str = "pr.thordata.net";

/// Variable names, primary first, then accepted aliases.
pub const USERNAME_VARS: &[&str] = &["CREDENTIAL_USERNAME", "THORDATA_USERNAME", "THORDATA_RESIDENTIAL_USERNAME"];
pub const PASSWORD_VARS: &[&str] = &["CREDENTIAL_PASSWORD", "THORDATA_PASSWORD", "THORDATA_RESIDENTIAL_PASSWORD"];
pub const HOST_VARS: &[&str] = &["PROXY_HOST", "THORDATA_PROXY_HOST"];
pub const PORT_VARS: &[&str] = &["PROXY_PORT", "THORDATA_PROXY_PORT"];

/// How the proxy recognises us.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Username and password embedded in the proxy URL.
    #[default]
    Credentials,
    /// The proxy trusts our source IP; no credentials are sent.
    Whitelist,
}

/// Proxy settings for a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Raw account credentials. `None` only in [`AuthMode::Whitelist`].
    pub credentials: Option<UserKey>,
    pub host: String,
    pub port: u16,
    pub scheme: ProxyScheme,
    /// Location selectors. Only meaningful with credentials.
    pub geo: GeoTarget,
    pub session: Option<StickySession>,
}

impl ProxyConfig {
    pub fn new<H: Into<String>>(credentials: Option<UserKey>, host: H, port: u16) -> Self {
        Self {
            credentials,
            host: host.into(),
            port,
            scheme: ProxyScheme::default(),
            geo: GeoTarget::default(),
            session: None,
        }
    }

    /// Reads credentials and endpoint from `source`.
    ///
    /// Fails before anything touches the network when the credentials are
    /// missing (outside whitelist mode) or the port does not parse.
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S, product: ProxyProduct, auth: AuthMode) -> Result<Self> {
        let credentials = match auth {
            AuthMode::Whitelist => None,
            AuthMode::Credentials => match (lookup(source, USERNAME_VARS), lookup(source, PASSWORD_VARS)) {
                (Some(username), Some(password)) => Some(UserKey::new(username, password)),
                _ => {
                    let msg = format!("Set {} and {} (environment or .env file)", USERNAME_VARS[0], PASSWORD_VARS[0]);
                    return Err(msg.into());
                }
            },
        };

        let host = lookup(source, HOST_VARS).unwrap_or_else(|| DEFAULT_PROXY_HOST.to_string());
        let port = match lookup(source, PORT_VARS) {
            Some(port) => parse_port(&port)?,
            None => product.default_port(),
        };

        Ok(Self::new(credentials, host, port))
    }

    pub fn with_scheme(mut self, scheme: ProxyScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_country<C: Into<String>>(mut self, country: C) -> Result<Self> {
        self.geo = std::mem::take(&mut self.geo).with_country(country)?;
        Ok(self)
    }

    /// Replaces all location selectors. Fails if state, city or ASN lack a country.
    pub fn with_geo(mut self, geo: GeoTarget) -> Result<Self> {
        geo.validate()?;
        self.geo = geo;
        Ok(self)
    }

    pub fn with_session(mut self, session: StickySession) -> Self {
        self.session = Some(session);
        self
    }

    /// The derived proxy user-info, if credentials are in use.
    pub fn credential(&self) -> Option<ProxyCredential> {
        let key = self.credentials.as_ref()?;
        // validated on the way in
        let mut cred = ProxyCredential::new(key.username.as_str()).with_geo(self.geo.clone()).ok()?;
        if let Some(session) = &self.session {
            cred = cred.with_session(session.clone());
        }
        Some(cred)
    }

    pub fn endpoint(&self) -> ProxyEndpoint {
        let auth = self
            .credentials
            .as_ref()
            .zip(self.credential())
            .map(|(key, cred)| cred.to_user_key(key.password.as_str()));
        ProxyEndpoint::new(self.scheme, self.host.as_str(), self.port, auth)
    }
}

fn lookup<S: ConfigSource + ?Sized>(source: &S, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| source.var(key))
}

fn parse_port(value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(format!("Invalid proxy port {value:?}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply() {
        let source = env(&[("CREDENTIAL_USERNAME", "alice"), ("CREDENTIAL_PASSWORD", "secret")]);
        let config = ProxyConfig::from_source(&source, ProxyProduct::Residential, AuthMode::Credentials).unwrap();
        assert_eq!(config.host, "pr.thordata.net");
        assert_eq!(config.port, 9999);
        assert_eq!(config.scheme, ProxyScheme::Http);
        assert_eq!(config.credentials, Some(UserKey::new("alice", "secret")));
        assert_eq!(config.endpoint().address(), "pr.thordata.net:9999");
    }

    #[test]
    fn missing_credentials() {
        for source in [
            env(&[]),
            env(&[("CREDENTIAL_USERNAME", "alice")]),
            env(&[("CREDENTIAL_PASSWORD", "secret")]),
            env(&[("CREDENTIAL_USERNAME", ""), ("CREDENTIAL_PASSWORD", "")]),
        ] {
            let err = ProxyConfig::from_source(&source, ProxyProduct::Residential, AuthMode::Credentials).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config);
            assert!(err.to_string().contains("CREDENTIAL_USERNAME"));
        }
    }

    #[test]
    fn whitelist_needs_no_credentials() {
        let config = ProxyConfig::from_source(&env(&[]), ProxyProduct::Residential, AuthMode::Whitelist).unwrap();
        assert_eq!(config.credentials, None);
        assert_eq!(config.credential(), None);
        assert_eq!(config.endpoint().url(), "http://pr.thordata.net:9999");
    }

    #[test]
    fn overrides_and_aliases() {
        let source = env(&[
            ("THORDATA_USERNAME", "alias-user"),
            ("CREDENTIAL_USERNAME", "primary-user"),
            ("THORDATA_PASSWORD", "pw"),
            ("THORDATA_PROXY_HOST", "gate.example"),
            ("PROXY_PORT", " 8080 "),
        ]);
        let config = ProxyConfig::from_source(&source, ProxyProduct::Residential, AuthMode::Credentials).unwrap();
        assert_eq!(config.credentials, Some(UserKey::new("primary-user", "pw")));
        assert_eq!(config.host, "gate.example");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn product_port_only_when_unset() {
        let mut source = env(&[("CREDENTIAL_USERNAME", "a"), ("CREDENTIAL_PASSWORD", "b")]);
        let config = ProxyConfig::from_source(&source, ProxyProduct::Mobile, AuthMode::Credentials).unwrap();
        assert_eq!(config.port, 5555);

        source.insert("PROXY_PORT".into(), "1234".into());
        let config = ProxyConfig::from_source(&source, ProxyProduct::Mobile, AuthMode::Credentials).unwrap();
        assert_eq!(config.port, 1234);
    }

    #[test]
    fn bad_port() {
        for port in ["abc", "0", "70000", "-1"] {
            let source = env(&[("CREDENTIAL_USERNAME", "a"), ("CREDENTIAL_PASSWORD", "b"), ("PROXY_PORT", port)]);
            let err = ProxyConfig::from_source(&source, ProxyProduct::Residential, AuthMode::Credentials).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{port}");
        }
    }

    #[test]
    fn derived_credential() {
        let config = ProxyConfig::new(Some(UserKey::new("alice", "secret")), "127.0.0.1", 3128);
        assert_eq!(config.credential().unwrap().to_string(), "td-customer-alice");

        let config = config
            .with_country("de")
            .unwrap()
            .with_session(StickySession::new("s1", 5).unwrap());
        let key = config.endpoint();
        assert_eq!(
            key.auth().unwrap(),
            &UserKey::new("td-customer-alice-country-de-sessid-s1-sesstime-5", "secret")
        );
    }

    #[test]
    fn geo_requires_country() {
        let config = ProxyConfig::new(Some(UserKey::new("alice", "secret")), "127.0.0.1", 3128);
        let state = GeoTarget::new().with_state("bavaria").unwrap();
        assert_eq!(config.clone().with_geo(state.clone()).unwrap_err().kind(), ErrorKind::Config);

        let config = config.with_geo(state.with_country("de").unwrap()).unwrap();
        assert_eq!(config.credential().unwrap().to_string(), "td-customer-alice-country-de-state-bavaria");
    }
}
