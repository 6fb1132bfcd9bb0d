use crate::error::Result;
use std::{collections::HashMap, path::Path};

/// Where configuration variables are looked up.
///
/// Empty values are reported as unset, so an exported-but-blank variable
/// never masks a fallback.
pub trait ConfigSource {
    fn var(&self, key: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The current process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl ConfigSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Variables parsed from a `.env`-style file. The process environment is left untouched.
#[derive(Debug, Default, Clone)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        log::debug!("loaded {} variable(s) from {}", vars.len(), path.display());
        Ok(Self { vars })
    }

    /// Like [`EnvFile::load`], but a missing file yields an empty source.
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::trace!("{} not found, skipped", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl ConfigSource for EnvFile {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.var(key)
    }
}

/// Two sources stacked: `primary` wins, `fallback` fills the gaps.
#[derive(Debug, Default, Clone)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: ConfigSource, B: ConfigSource> ConfigSource for Layered<A, B> {
    fn var(&self, key: &str) -> Option<String> {
        self.primary.var(key).or_else(|| self.fallback.var(key))
    }
}
