//! Client connection options for reaching the planned server.

use crate::{
    merge::{Combine, Last},
    validation::{Accumulate, Validated, required},
};

/// Partially specified connection options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialClientOptions {
    /// Host name, IP address or unix socket directory.
    pub host: Last<String>,
    /// TCP port, also used to name the unix socket file.
    pub port: Last<u16>,
    /// Database to connect to.
    pub dbname: Last<String>,
    /// Role to connect as.
    pub user: Last<String>,
    /// Password for `user`.
    pub password: Last<String>,
}

impl PartialClientOptions {
    /// Resolve into [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Reports each of `host`, `port` and `dbname` that is unset.
    pub fn complete(self) -> Validated<ClientOptions> {
        let ((host, port), dbname) = required("host", self.host)
            .and_also(required("port", self.port))
            .and_also(required("dbname", self.dbname))?;
        Ok(ClientOptions {
            host,
            port,
            dbname,
            user: self.user.into_option(),
            password: self.password.into_option(),
        })
    }
}

impl Combine for PartialClientOptions {
    fn combine(self, later: Self) -> Self {
        Self {
            host: self.host.combine(later.host),
            port: self.port.combine(later.port),
            dbname: self.dbname.combine(later.dbname),
            user: self.user.combine(later.user),
            password: self.password.combine(later.password),
        }
    }
}

/// Resolved connection options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    /// Host name, IP address or unix socket directory.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Database to connect to.
    pub dbname: String,
    /// Role to connect as, when not the libpq default.
    pub user: Option<String>,
    /// Password for `user`.
    pub password: Option<String>,
}

impl ClientOptions {
    /// Render a libpq keyword/value connection string.
    ///
    /// ```
    /// use tmp_postgres::ClientOptions;
    ///
    /// let options = ClientOptions {
    ///     host: "/tmp/sock dir".into(),
    ///     port: 5432,
    ///     dbname: "postgres".into(),
    ///     user: None,
    ///     password: Some("it's".into()),
    /// };
    /// assert_eq!(
    ///     options.to_connection_string(),
    ///     r"host='/tmp/sock dir' port=5432 dbname=postgres password='it\'s'",
    /// );
    /// ```
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        let mut out = String::new();
        push_pair(&mut out, "host", &self.host);
        push_pair(&mut out, "port", &self.port.to_string());
        push_pair(&mut out, "dbname", &self.dbname);
        if let Some(user) = &self.user {
            push_pair(&mut out, "user", user);
        }
        if let Some(password) = &self.password {
            push_pair(&mut out, "password", password);
        }
        out
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    out.push_str(key);
    out.push('=');
    if needs_quotes {
        out.push('\'');
        out.push_str(&value.replace('\\', r"\\").replace('\'', r"\'"));
        out.push('\'');
    } else {
        out.push_str(value);
    }
}
