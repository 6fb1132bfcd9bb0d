#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod credential;
pub mod error;

pub use crate::{
    client::{IpCheck, IpInfo, ProxyEndpoint, RequestOptions, run},
    config::{AuthMode, ConfigSource, ProxyConfig},
    credential::{GeoTarget, ProxyCredential, ProxyProduct, ProxyScheme, StickySession, UserKey},
    error::{Error, ErrorKind, Result},
};
