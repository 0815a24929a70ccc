//! Immutable server context shared by the bridge components.

use std::fmt;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;
use crate::http::request::Params;

/// An event exchange the kernel may subscribe to, optionally bound to a
/// named queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub name: String,
    pub queue: Option<String>,
}

impl Exchange {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: None,
        }
    }

    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Parse `"exchange"` or `"exchange:queue"`.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidExchange {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (name, queue) = match spec.split_once(':') {
            Some((name, queue)) => (name.trim(), Some(queue.trim())),
            None => (spec.trim(), None),
        };

        if name.is_empty() {
            return Err(invalid("exchange name is empty"));
        }
        match queue {
            Some(queue) if queue.is_empty() => Err(invalid("queue name is empty")),
            Some(queue) if queue.contains(':') => Err(invalid("too many ':' separators")),
            Some(queue) => Ok(Self::new(name).with_queue(queue)),
            None => Ok(Self::new(name)),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.queue {
            Some(queue) => write!(f, "{}:{}", self.name, queue),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Environment, toggles and exchange subscriptions for one bridge.
///
/// `server_params` are server variables captured once when the transport
/// binds; they seed the server bag of every application request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerContext {
    environment: String,
    debug: bool,
    uploads_disabled: bool,
    cookies_disabled: bool,
    exchanges: Vec<Exchange>,
    server_params: Params,
}

impl ServerContext {
    pub fn new(environment: impl Into<String>, debug: bool) -> Self {
        Self {
            environment: environment.into(),
            debug,
            uploads_disabled: false,
            cookies_disabled: false,
            exchanges: Vec::new(),
            server_params: Params::new(),
        }
    }

    /// Build from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ValidationError> {
        let exchanges = config
            .exchanges
            .iter()
            .map(|spec| Exchange::parse(spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(config.environment.clone(), config.debug)
            .with_uploads_disabled(config.uploads_disabled)
            .with_cookies_disabled(config.cookies_disabled)
            .with_exchanges(exchanges))
    }

    pub fn with_uploads_disabled(mut self, disabled: bool) -> Self {
        self.uploads_disabled = disabled;
        self
    }

    pub fn with_cookies_disabled(mut self, disabled: bool) -> Self {
        self.cookies_disabled = disabled;
        self
    }

    pub fn with_exchanges(mut self, exchanges: Vec<Exchange>) -> Self {
        self.exchanges = exchanges;
        self
    }

    pub fn with_server_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_params.insert(name.into(), value.into());
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn uploads_disabled(&self) -> bool {
        self.uploads_disabled
    }

    pub fn cookies_disabled(&self) -> bool {
        self.cookies_disabled
    }

    pub fn has_exchanges(&self) -> bool {
        !self.exchanges.is_empty()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn server_params(&self) -> &Params {
        &self.server_params
    }
}
