//! Configuration for the HTTP redirect delivery.
//!
//! Options are assembled with [`RedirectOptionsBuilder`], starting from the
//! defaults. Every setter validates its own input, so a bad host, port or
//! TLS pair is rejected before any listener binds:
//!
//! ```
//! use nanolink::domain::redirect::RedirectOptions;
//!
//! # fn main() -> Result<(), nanolink::AppError> {
//! let options = RedirectOptions::builder()
//!     .host("::1")?
//!     .port(8080)?
//!     .not_found_template(false)
//!     .build();
//!
//! assert_eq!(options.socket_addr().to_string(), "[::1]:8080");
//! # Ok(())
//! # }
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 2000;

/// Address family of the bind host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    IPv4,
    IPv6,
}

/// PEM certificate and private key used when TLS is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// Validated, immutable settings for the redirect listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectOptions {
    host: IpAddr,
    port: u16,
    tls: Option<TlsFiles>,
    not_found_template: bool,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            tls: None,
            not_found_template: true,
        }
    }
}

impl RedirectOptions {
    /// Starts a builder from the default options.
    pub fn builder() -> RedirectOptionsBuilder {
        RedirectOptionsBuilder {
            options: Self::default(),
        }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn host_type(&self) -> HostType {
        match self.host {
            IpAddr::V4(_) => HostType::IPv4,
            IpAddr::V6(_) => HostType::IPv6,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn tls(&self) -> Option<&TlsFiles> {
        self.tls.as_ref()
    }

    /// Whether a missing link renders the HTML 404 page instead of a bare status.
    pub fn not_found_template(&self) -> bool {
        self.not_found_template
    }

    /// Address the listener binds to. IPv6 hosts are bracketed when displayed.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Applies option setters in order over the defaults.
#[derive(Debug, Clone)]
pub struct RedirectOptionsBuilder {
    options: RedirectOptions,
}

impl RedirectOptionsBuilder {
    /// Sets the bind host.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Invalid`] unless `host` is an IPv4 or IPv6 literal.
    /// Hostnames such as `localhost` are rejected.
    pub fn host(mut self, host: &str) -> Result<Self, AppError> {
        let parsed = host
            .parse::<IpAddr>()
            .map_err(|_| AppError::invalid("host", format!("'{host}' must be IPv4 or IPv6")))?;

        self.options.host = parsed;
        Ok(self)
    }

    /// Sets the bind port.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Invalid`] if `port` is outside `0..=65535`.
    pub fn port(mut self, port: i64) -> Result<Self, AppError> {
        let port = u16::try_from(port).map_err(|_| {
            AppError::invalid("port", format!("{port} must be between 0 and 65535"))
        })?;

        self.options.port = port;
        Ok(self)
    }

    /// Enables TLS with the given certificate and key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Invalid`] if either path is empty; the two are
    /// only meaningful together.
    pub fn tls(
        mut self,
        cert_file: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<Self, AppError> {
        let cert_file = cert_file.as_ref();
        let key_file = key_file.as_ref();

        if cert_file.as_os_str().is_empty() {
            return Err(AppError::invalid("tls", "cert file is required when TLS is enabled"));
        }
        if key_file.as_os_str().is_empty() {
            return Err(AppError::invalid("tls", "key file is required when TLS is enabled"));
        }

        self.options.tls = Some(TlsFiles {
            cert_file: cert_file.to_path_buf(),
            key_file: key_file.to_path_buf(),
        });
        Ok(self)
    }

    pub fn not_found_template(mut self, enabled: bool) -> Self {
        self.options.not_found_template = enabled;
        self
    }

    pub fn build(self) -> RedirectOptions {
        self.options
    }
}
