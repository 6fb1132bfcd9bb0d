use crate::error::Result;

/// Egress location selectors carried in the proxy user-info.
///
/// Rendered in the order the gateway parses them:
///
/// ```plain
/// continent-<c>-country-<cc>-state-<s>-city-<c>-asn-<n>
/// ```
///
/// State, city and ASN only narrow down a country and are rejected on their
/// own by [`GeoTarget::validate`]. Values are passed through verbatim.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GeoTarget {
    continent: Option<String>,
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    asn: Option<String>,
}

impl GeoTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_continent<S: Into<String>>(mut self, continent: S) -> Result<Self> {
        self.continent = Some(selector("continent", continent.into(), false)?);
        Ok(self)
    }

    pub fn with_country<S: Into<String>>(mut self, country: S) -> Result<Self> {
        self.country = Some(selector("country", country.into(), false)?);
        Ok(self)
    }

    /// Underscores stand in for spaces, e.g. `new_york`.
    pub fn with_state<S: Into<String>>(mut self, state: S) -> Result<Self> {
        self.state = Some(selector("state", state.into(), true)?);
        Ok(self)
    }

    /// Underscores stand in for spaces, e.g. `los_angeles`.
    pub fn with_city<S: Into<String>>(mut self, city: S) -> Result<Self> {
        self.city = Some(selector("city", city.into(), true)?);
        Ok(self)
    }

    /// Autonomous system, e.g. `AS12322`.
    pub fn with_asn<S: Into<String>>(mut self, asn: S) -> Result<Self> {
        self.asn = Some(selector("asn", asn.into(), false)?);
        Ok(self)
    }

    pub fn continent(&self) -> Option<&str> {
        self.continent.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn asn(&self) -> Option<&str> {
        self.asn.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors().next().is_none()
    }

    /// `(key, value)` pairs that are set, in user-info order.
    pub fn selectors(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("continent", &self.continent),
            ("country", &self.country),
            ("state", &self.state),
            ("city", &self.city),
            ("asn", &self.asn),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key, value.as_deref()?)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.country.is_none() {
            for (key, value) in [("state", &self.state), ("city", &self.city), ("asn", &self.asn)] {
                if value.is_some() {
                    return Err(format!("Geo selector {key} requires a country").into());
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for GeoTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (key, value)) in self.selectors().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{key}-{value}")?;
        }
        Ok(())
    }
}

/// Selector values end up inside a `-`-separated user-info.
fn selector(key: &str, value: String, allow_underscore: bool) -> Result<String> {
    let valid = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || (allow_underscore && b == b'_'));
    if !valid {
        return Err(format!("Invalid {key} {value:?}: expected ASCII letters or digits").into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn selector_order() {
        let geo = GeoTarget::new()
            .with_asn("AS12322")
            .unwrap()
            .with_city("houston")
            .unwrap()
            .with_state("texas")
            .unwrap()
            .with_country("us")
            .unwrap()
            .with_continent("na")
            .unwrap();
        geo.validate().unwrap();
        assert_eq!(geo.to_string(), "continent-na-country-us-state-texas-city-houston-asn-AS12322");
    }

    #[test]
    fn continent_alone() {
        let geo = GeoTarget::new().with_continent("as").unwrap();
        geo.validate().unwrap();
        assert_eq!(geo.to_string(), "continent-as");
        assert!(GeoTarget::new().is_empty());
        assert_eq!(GeoTarget::new().to_string(), "");
    }

    #[test]
    fn narrowing_needs_country() {
        let state = GeoTarget::new().with_state("california").unwrap();
        let city = GeoTarget::new().with_continent("na").unwrap().with_city("new_york").unwrap();
        let asn = GeoTarget::new().with_asn("AS1").unwrap();
        for geo in [state, city, asn] {
            assert_eq!(geo.validate().unwrap_err().kind(), ErrorKind::Config, "{geo:?}");
        }
    }

    #[test]
    fn rejects_bad_values() {
        assert!(GeoTarget::new().with_city("los_angeles").is_ok());
        assert!(GeoTarget::new().with_country("u_s").is_err());
        assert!(GeoTarget::new().with_state("new-york").is_err());
        assert!(GeoTarget::new().with_asn("").is_err());
        assert!(GeoTarget::new().with_continent("e u").is_err());
    }
}
