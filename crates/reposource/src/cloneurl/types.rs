use std::fmt;

/// Which dialect a clone URL was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlForm {
    /// `[user@]host:path` (scp-like syntax, no scheme).
    SshShorthand,
    /// `scheme://[user[:secret]@]host[:port]/path`.
    Url { scheme: String },
}

/// Credentials embedded in a clone URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A parsed clone URL. Produced per resolution call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneUrl {
    pub form: UrlForm,
    pub credentials: Option<Credentials>,
    /// ASCII lowercase host; internationalized names in punycode.
    pub host: String,
    pub port: Option<u16>,
    /// Percent-decoded path, dot segments and slashes as written.
    pub path: String,
}

impl CloneUrl {
    pub fn is_ssh_shorthand(&self) -> bool {
        matches!(self.form, UrlForm::SshShorthand)
    }
}

/// Renders the URL with any secret replaced, so descriptors are safe to log.
impl fmt::Display for CloneUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let UrlForm::Url { scheme } = &self.form {
            write!(f, "{scheme}://")?;
        }
        if let Some(creds) = &self.credentials {
            f.write_str(&creds.user)?;
            if creds.secret.is_some() {
                f.write_str(":***")?;
            }
            f.write_str("@")?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        match self.form {
            UrlForm::SshShorthand => write!(f, ":{}", self.path),
            UrlForm::Url { .. } => f.write_str(&self.path),
        }
    }
}
