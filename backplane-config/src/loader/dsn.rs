//! Database DSN normalisation.

use url::Url;

use crate::ConfigLoadError;

/// URL schemes the sqlx `Any` driver set understands.
const URL_SCHEMES: &[&str] = &["mysql", "mariadb", "postgres", "postgresql"];

/// Address used by MySQL drivers when a driver-form DSN omits one.
const DEFAULT_MYSQL_ADDRESS: &str = "127.0.0.1:3306";

/// Normalise a database DSN into a URL sqlx can open.
///
/// URL-form DSNs (`mysql://`, `mariadb://`, `postgres://`, `postgresql://`)
/// are validated and returned unchanged. Driver-form MySQL DSNs such as
/// `app:secret@tcp(db:3306)/app?parseTime=true` are rewritten to
/// `mysql://app:secret@db:3306/app?parseTime=true`, percent-encoding the
/// credentials on the way.
pub fn normalize_dsn(raw: &str) -> Result<String, ConfigLoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigLoadError::invalid_dsn("DSN is empty"));
    }

    if let Some((scheme, _)) = trimmed.split_once("://") {
        let scheme = scheme.to_ascii_lowercase();
        if !URL_SCHEMES.contains(&scheme.as_str()) {
            return Err(ConfigLoadError::invalid_dsn(format!(
                "unsupported scheme `{scheme}`"
            )));
        }
        Url::parse(trimmed)
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        return Ok(trimmed.to_owned());
    }

    from_driver_dsn(trimmed)
}

/// `[user[:password]@][tcp[(address)]]/dbname[?params]`
fn from_driver_dsn(dsn: &str) -> Result<String, ConfigLoadError> {
    let slash = dsn.rfind('/').ok_or_else(|| {
        ConfigLoadError::invalid_dsn("expected `/dbname` after the address")
    })?;
    let (prefix, rest) = (&dsn[..slash], &dsn[slash + 1..]);
    let (database, params) = match rest.split_once('?') {
        Some((database, params)) => (database, Some(params)),
        None => (rest, None),
    };

    let (credentials, endpoint) = match prefix.rfind('@') {
        Some(at) => (Some(&prefix[..at]), &prefix[at + 1..]),
        None => (None, prefix),
    };

    let address = match endpoint.split_once('(') {
        Some(("tcp", tail)) => tail.strip_suffix(')').ok_or_else(|| {
            ConfigLoadError::invalid_dsn("unterminated `tcp(` address")
        })?,
        Some((network, _)) => {
            return Err(ConfigLoadError::invalid_dsn(format!(
                "unsupported network `{network}`"
            )));
        }
        None if endpoint.is_empty() || endpoint == "tcp" => "",
        None => {
            return Err(ConfigLoadError::invalid_dsn(format!(
                "unrecognised address `{endpoint}`"
            )));
        }
    };
    let address = if address.trim().is_empty() {
        DEFAULT_MYSQL_ADDRESS
    } else {
        address.trim()
    };

    let mut url = Url::parse(&format!("mysql://{address}/"))
        .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;

    if let Some(credentials) = credentials {
        let (user, password) = match credentials.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (credentials, None),
        };
        url.set_username(user).map_err(|_| {
            ConfigLoadError::InvalidDatabaseUsername {
                username: user.to_owned(),
            }
        })?;
        if let Some(password) = password.filter(|value| !value.is_empty()) {
            url.set_password(Some(password))
                .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
        }
    }

    url.set_path(database);
    url.set_query(params.filter(|value| !value.is_empty()));

    Ok(url.to_string())
}
