//! Session credentials supplied per call
//!
//! SECURITY: The secret type clears its buffer on drop and never prints its content.

use crate::constants::DEFAULT_SSH_PORT;
use crate::utils::ValidationError;
use std::fmt;

const MAX_USERNAME_LEN: usize = 256;

/// Login name for the remote shell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();

        if username.trim().is_empty() {
            return Err(ValidationError::InvalidUsername(
                "Username cannot be empty".to_string(),
            ));
        }

        if username.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::InvalidUsername(format!(
                "Username exceeds maximum length ({MAX_USERNAME_LEN})"
            )));
        }

        Ok(Username(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Username {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

/// Password or other shared secret that zeros memory on drop
///
/// SECURITY: Neither `Debug` nor any other formatting reveals the content.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(secret: impl Into<String>) -> Self {
        SecureString(secret.into())
    }

    /// Borrow the secret. Only for handing to the transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        // SAFETY: we own the buffer and overwrite it with zero bytes, which is valid UTF-8
        unsafe {
            for byte in self.0.as_bytes_mut() {
                std::ptr::write_volatile(byte, 0);
            }
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(*** {} bytes ***)", self.0.len())
    }
}

/// Username, secret and SSH port for one remote-shell login
///
/// Never persisted; built per call by the service layer.
#[derive(Clone, Debug)]
pub struct Credentials {
    username: Username,
    secret: SecureString,
    port: u16,
}

impl Credentials {
    /// Credentials on the default SSH port
    pub fn new(username: Username, secret: SecureString) -> Self {
        Credentials {
            username,
            secret,
            port: DEFAULT_SSH_PORT,
        }
    }

    /// Override the SSH port. Port 0 is rejected.
    pub fn with_port(mut self, port: u16) -> Result<Self, ValidationError> {
        if port == 0 {
            return Err(ValidationError::InvalidPort(port));
        }
        self.port = port;
        Ok(self)
    }

    /// Build from raw request fields, validating username and port
    pub fn from_parts(
        username: &str,
        secret: &str,
        port: Option<u16>,
    ) -> Result<Self, ValidationError> {
        let creds = Credentials::new(Username::new(username)?, SecureString::new(secret));
        match port {
            Some(port) => creds.with_port(port),
            None => Ok(creds),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn secret(&self) -> &SecureString {
        &self.secret
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
