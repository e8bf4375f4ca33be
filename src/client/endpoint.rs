use std::fmt;

use thiserror::Error;

pub const SOCKET_PATH: &str = "/ws";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss
}

impl Scheme {
    pub fn name(&self) -> &'static str {
        match *self {
            Scheme::Ws => "ws",
            Scheme::Wss => "wss"
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("unsupported scheme `{0}`, expected http, https, ws or wss")]
    UnsupportedScheme(String),

    #[error("origin `{0}` has no host")]
    MissingHost(String),

    #[error("origin `{0}` carries credentials")]
    Credentials(String)
}

/// Where the battlefield socket lives, always `<scheme>://<host>/ws`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String
}

impl Endpoint {
    pub fn new(scheme: Scheme, host: &str) -> Self {
        Endpoint { scheme: scheme, host: host.to_string() }
    }

    /// Derives the socket endpoint from the origin the display is served
    /// from: secure pages get `wss`, everything else `ws`. A bare
    /// `host[:port]` is taken as plain `ws`.
    pub fn from_origin(origin: &str) -> Result<Endpoint, EndpointError> {
        let origin = origin.trim();

        let (scheme, rest) = match origin.find("://") {
            Some(index) => {
                let scheme = match &origin[..index] {
                    "http" | "ws" => Scheme::Ws,
                    "https" | "wss" => Scheme::Wss,
                    other => return Err(EndpointError::UnsupportedScheme(other.to_string()))
                };

                (scheme, &origin[index + 3..])
            },

            None => (Scheme::Ws, origin)
        };

        let host = rest.split(|c: char| c == '/' || c == '?' || c == '#').next().unwrap_or("");
        if host.is_empty() {
            return Err(EndpointError::MissingHost(origin.to_string()));
        }

        if host.contains('@') {
            return Err(EndpointError::Credentials(origin.to_string()));
        }

        Ok(Endpoint::new(scheme, host))
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme.name(), self.host, SOCKET_PATH)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.url())
    }
}
