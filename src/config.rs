use percent_encoding::percent_decode_str;

use crate::error::{RedisqlError, Result};

pub(crate) const DEFAULT_STATEMENT_KEY_PREFIX: &str = "redisql:stmt:";
const DEFAULT_PORT: u16 = 6379;

/// Client tuning knobs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Maximum number of backend connections held by the built-in pool.
    pub pool_size: usize,
    /// How long `acquire` waits for a free connection before failing with
    /// `PoolExhausted`.
    pub acquire_timeout_ms: u64,
    /// Extra attempts of a statement execution that failed with "statement
    /// not found". Zero keeps the registration race visible to the caller.
    pub statement_retries: u32,
    /// Delay between those attempts.
    pub retry_backoff_ms: u64,
    /// Prefix of the register-once gate keys.
    pub statement_key_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            pool_size: 8,
            acquire_timeout_ms: 5_000,
            statement_retries: 0,
            retry_backoff_ms: 10,
            statement_key_prefix: DEFAULT_STATEMENT_KEY_PREFIX.to_string(),
        }
    }
}

/// Parsed connection address.
///
/// Format: `redis://[:password@]host[:port][/]?dbname=<name>[&pool_size=N][&acquire_timeout_ms=N]`.
/// The database name is resolved once here and used for every command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db_name: String,
    pub pool_size: Option<usize>,
    pub acquire_timeout_ms: Option<u64>,
}

impl ConnectionConfig {
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = |reason: &str| RedisqlError::InvalidAddress(format!("{address}: {reason}"));

        let rest = address
            .trim()
            .strip_prefix("redis://")
            .ok_or_else(|| invalid("expected redis:// scheme"))?;

        let (authority, query) = match rest.split_once('?') {
            Some((authority, query)) => (authority, query),
            None => (rest, ""),
        };
        let authority = authority.split('/').next().unwrap_or_default();

        let (password, host_port) = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => {
                let password = userinfo.rsplit(':').next().unwrap_or_default();
                let password = percent_decode_str(password)
                    .decode_utf8()
                    .map_err(|_| invalid("password is not valid UTF-8"))?;
                let password = (!password.is_empty()).then(|| password.into_owned());
                (password, host_port)
            }
            None => (None, authority),
        };

        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .map_err(|_| invalid("port is not a number"))?,
            ),
            None => (host_port, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let mut db_name = None;
        let mut pool_size = None;
        let mut acquire_timeout_ms = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "dbname" => db_name = Some(value.to_string()),
                "pool_size" => {
                    pool_size = Some(
                        value
                            .parse::<usize>()
                            .map_err(|_| invalid("pool_size is not a number"))?,
                    )
                }
                "acquire_timeout_ms" => {
                    acquire_timeout_ms = Some(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid("acquire_timeout_ms is not a number"))?,
                    )
                }
                _ => {}
            }
        }

        let db_name = db_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| invalid("missing dbname query parameter"))?;

        Ok(Self {
            host: host.to_string(),
            port,
            password,
            db_name,
            pool_size,
            acquire_timeout_ms,
        })
    }

    /// `host:port` for the TCP connect.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Folds address-level overrides into `options`.
    pub fn apply_to(&self, mut options: ClientOptions) -> ClientOptions {
        if let Some(pool_size) = self.pool_size {
            options.pool_size = pool_size;
        }
        if let Some(timeout) = self.acquire_timeout_ms {
            options.acquire_timeout_ms = timeout;
        }
        options
    }
}
