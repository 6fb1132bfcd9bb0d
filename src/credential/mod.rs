mod geo;
mod product;
mod session;

pub use self::{
    geo::GeoTarget,
    product::{ProxyProduct, ProxyScheme},
    session::{DEFAULT_SESSION_MINUTES, SESSION_MINUTES, StickySession},
};

use crate::error::Result;

/// Prefix every account name carries in the proxy user-info.
pub const CUSTOMER_PREFIX: &str = "td-customer-";

/// Basic-auth pair presented to the proxy.
#[derive(Default, Debug, Eq, PartialEq, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct UserKey {
    pub username: String,
    pub password: String,
}

impl UserKey {
    /// Constructs `UserKey` with the specified username and a password.
    pub fn new<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// The user-info a geo-targeting proxy expects in place of the bare account name.
///
/// ```plain
/// td-customer-<account>[-<geo selectors>][-sessid-<id>-sesstime-<minutes>]
/// ```
///
/// The upstream proxy reads the egress location and session straight out of
/// this string, so nothing beyond plain concatenation happens here.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProxyCredential {
    account: String,
    geo: GeoTarget,
    session: Option<StickySession>,
}

impl ProxyCredential {
    pub fn new<A: Into<String>>(account: A) -> Self {
        Self {
            account: account.into(),
            geo: GeoTarget::default(),
            session: None,
        }
    }

    /// Pins the egress country.
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

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn geo(&self) -> &GeoTarget {
        &self.geo
    }

    pub fn session(&self) -> Option<&StickySession> {
        self.session.as_ref()
    }

    /// Pairs the derived user-info with the account password.
    pub fn to_user_key<P: Into<String>>(&self, password: P) -> UserKey {
        UserKey::new(self.to_string(), password)
    }
}

impl std::fmt::Display for ProxyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CUSTOMER_PREFIX}{}", self.account)?;
        if !self.geo.is_empty() {
            write!(f, "-{}", self.geo)?;
        }
        if let Some(session) = &self.session {
            write!(f, "-{session}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn plain_credential() {
        let cred = ProxyCredential::new("alice");
        assert_eq!(cred.to_string(), "td-customer-alice");
    }

    #[test]
    fn geo_credential() {
        for (user, country) in [("alice", "us"), ("bob_42", "DE"), ("c", "gb")] {
            let cred = ProxyCredential::new(user).with_country(country).unwrap();
            assert_eq!(cred.to_string(), format!("td-customer-{user}-country-{country}"));
        }
    }

    #[test]
    fn sticky_credential_follows_country() {
        let session = StickySession::new("ab12cd", 15).unwrap();
        let cred = ProxyCredential::new("alice").with_country("us").unwrap().with_session(session.clone());
        assert_eq!(cred.to_string(), "td-customer-alice-country-us-sessid-ab12cd-sesstime-15");

        let cred = ProxyCredential::new("alice").with_session(session);
        assert_eq!(cred.to_string(), "td-customer-alice-sessid-ab12cd-sesstime-15");
    }

    #[test]
    fn geo_selectors_precede_session() {
        let geo = GeoTarget::new()
            .with_country("us")
            .unwrap()
            .with_city("houston")
            .unwrap()
            .with_continent("na")
            .unwrap()
            .with_state("texas")
            .unwrap();
        let cred = ProxyCredential::new("alice")
            .with_geo(geo)
            .unwrap()
            .with_session(StickySession::new("s9", 30).unwrap());
        assert_eq!(
            cred.to_string(),
            "td-customer-alice-continent-na-country-us-state-texas-city-houston-sessid-s9-sesstime-30"
        );

        let geo = GeoTarget::new().with_country("fr").unwrap().with_asn("AS12322").unwrap();
        let cred = ProxyCredential::new("alice").with_geo(geo).unwrap();
        assert_eq!(cred.to_string(), "td-customer-alice-country-fr-asn-AS12322");

        let geo = GeoTarget::new().with_continent("as").unwrap();
        let cred = ProxyCredential::new("alice").with_geo(geo).unwrap();
        assert_eq!(cred.to_string(), "td-customer-alice-continent-as");
    }

    #[test]
    fn city_without_country_rejected() {
        let geo = GeoTarget::new().with_city("houston").unwrap();
        let err = ProxyCredential::new("alice").with_geo(geo).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_bad_country() {
        for bad in ["", "us-east", "d e", "fr:1", "x@y"] {
            let err = ProxyCredential::new("alice").with_country(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{bad:?}");
        }
    }

    #[test]
    fn user_key_from_credential() {
        let key = ProxyCredential::new("alice").with_country("de").unwrap().to_user_key("secret");
        assert_eq!(key, UserKey::new("td-customer-alice-country-de", "secret"));
    }
}
