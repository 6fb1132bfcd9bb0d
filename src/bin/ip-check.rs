use proxy_ipcheck::{
    AuthMode, ConfigSource, GeoTarget, ProxyConfig, ProxyProduct, ProxyScheme, RequestOptions, Result, StickySession,
    client::{self, GEO_TARGET, PLAIN_TARGET},
    config::{EnvFile, Layered, ProcessEnv},
    credential::DEFAULT_SESSION_MINUTES,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};

/// Check the egress IP and location of a geo-targeting forward proxy.
#[derive(clap::Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about = "Check the egress IP and location of a geo-targeting forward proxy.", long_about = None)]
pub struct CmdOpt {
    /// Egress continent code, e.g. `eu`.
    #[clap(long, value_name = "code", conflicts_with_all = ["plain", "whitelist"])]
    continent: Option<String>,

    /// Egress country code [default: us, unless another location is given].
    #[clap(short, long, value_name = "code", conflicts_with_all = ["plain", "whitelist"])]
    country: Option<String>,

    /// Egress state within the country, e.g. `california`.
    #[clap(long, value_name = "name", conflicts_with_all = ["plain", "whitelist"])]
    state: Option<String>,

    /// Egress city within the country, e.g. `los_angeles`.
    #[clap(long, value_name = "name", conflicts_with_all = ["plain", "whitelist"])]
    city: Option<String>,

    /// Egress autonomous system within the country, e.g. `AS12322`.
    #[clap(long, value_name = "asn", conflicts_with_all = ["plain", "whitelist"])]
    asn: Option<String>,

    /// No geo-targeting: plain account name and plain IP echo target.
    #[clap(long)]
    plain: bool,

    /// Keep the same egress IP using a random sticky session id.
    #[clap(long, conflicts_with_all = ["session_id", "whitelist"])]
    sticky: bool,

    /// Keep the same egress IP using this sticky session id.
    #[clap(long, value_name = "id", conflicts_with = "whitelist")]
    session_id: Option<String>,

    /// Sticky session lifetime in minutes (1-90).
    #[clap(long, value_name = "minutes", default_value_t = DEFAULT_SESSION_MINUTES)]
    session_minutes: u32,

    /// Proxy product, selects the default gateway port.
    #[arg(long, value_name = "product", value_enum, default_value = "residential")]
    product: ArgProduct,

    /// Protocol spoken to the proxy.
    #[arg(long, value_name = "scheme", value_enum, default_value = "http")]
    scheme: ArgScheme,

    /// IP whitelist mode: send no proxy credentials.
    #[clap(long)]
    whitelist: bool,

    /// Env file overlaid under the process environment [default: ./.env if present].
    #[clap(long, value_name = "path")]
    env_file: Option<PathBuf>,

    /// IP-echo URL to request.
    #[clap(short, long, value_name = "url")]
    target: Option<String>,

    /// User-Agent header sent to the target.
    #[clap(long, value_name = "ua")]
    user_agent: Option<String>,

    /// Request timeout in seconds.
    #[clap(short = 'm', long, value_name = "seconds")]
    timeout: Option<u64>,

    /// Do not verify TLS certificates. Only for proxies you trust.
    #[clap(long)]
    insecure: bool,

    /// Verbosity level
    #[arg(short, long, value_name = "level", value_enum, default_value = "info")]
    verbosity: ArgVerbosity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
enum ArgVerbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum ArgProduct {
    Residential,
    Mobile,
    Datacenter,
    Isp,
}

impl From<ArgProduct> for ProxyProduct {
    fn from(p: ArgProduct) -> Self {
        match p {
            ArgProduct::Residential => ProxyProduct::Residential,
            ArgProduct::Mobile => ProxyProduct::Mobile,
            ArgProduct::Datacenter => ProxyProduct::Datacenter,
            ArgProduct::Isp => ProxyProduct::Isp,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum ArgScheme {
    Http,
    Https,
    Socks5h,
}

impl From<ArgScheme> for ProxyScheme {
    fn from(s: ArgScheme) -> Self {
        match s {
            ArgScheme::Http => ProxyScheme::Http,
            ArgScheme::Https => ProxyScheme::Https,
            ArgScheme::Socks5h => ProxyScheme::Socks5h,
        }
    }
}

impl CmdOpt {
    fn load_config(&self) -> Result<ProxyConfig> {
        self.load_config_from(ProcessEnv)
    }

    /// `env` takes precedence over the env file.
    fn load_config_from<S: ConfigSource>(&self, env: S) -> Result<ProxyConfig> {
        let source = Layered::new(env, self.env_file()?);

        let auth = if self.whitelist { AuthMode::Whitelist } else { AuthMode::Credentials };
        let config = ProxyConfig::from_source(&source, self.product.into(), auth)?.with_scheme(self.scheme.into());

        // whitelisted requests carry no user-info, so there is nowhere to put geo or session
        if self.whitelist {
            return Ok(config);
        }
        let mut config = config.with_geo(self.geo()?)?;
        if let Some(id) = &self.session_id {
            config = config.with_session(StickySession::new(id.as_str(), self.session_minutes)?);
        } else if self.sticky {
            config = config.with_session(StickySession::random(self.session_minutes)?);
        }
        Ok(config)
    }

    fn env_file(&self) -> Result<EnvFile> {
        match &self.env_file {
            Some(path) => EnvFile::load(path),
            None => EnvFile::load_if_exists(".env"),
        }
    }

    fn geo(&self) -> Result<GeoTarget> {
        let mut geo = GeoTarget::new();
        if self.plain {
            return Ok(geo);
        }
        let narrowed = [&self.continent, &self.state, &self.city, &self.asn].iter().any(|v| v.is_some());
        if let Some(continent) = &self.continent {
            geo = geo.with_continent(continent.as_str())?;
        }
        match &self.country {
            Some(country) => geo = geo.with_country(country.as_str())?,
            None if !narrowed => geo = geo.with_country("us")?,
            None => {}
        }
        if let Some(state) = &self.state {
            geo = geo.with_state(state.as_str())?;
        }
        if let Some(city) = &self.city {
            geo = geo.with_city(city.as_str())?;
        }
        if let Some(asn) = &self.asn {
            geo = geo.with_asn(asn.as_str())?;
        }
        Ok(geo)
    }

    fn request_options(&self) -> RequestOptions {
        let default_target = if self.plain { PLAIN_TARGET } else { GEO_TARGET };
        let mut options = RequestOptions::new(self.target.as_deref().unwrap_or(default_target));
        if let Some(ua) = &self.user_agent {
            options.user_agent = ua.clone();
        }
        options.timeout = self.timeout.map(Duration::from_secs);
        options.insecure = self.insecure;
        options
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let opt: CmdOpt = clap::Parser::parse();

    let default = format!("proxy_ipcheck={0:?},{1}={0:?}", opt.verbosity, module_path!());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();

    let result = async {
        let config = opt.load_config()?;
        client::run(&config, &opt.request_options(), &mut std::io::stdout()).await
    }
    .await;

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("[ERROR] {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
