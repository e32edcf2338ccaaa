//! Local hostname detection used for the GELF `host` field.

use std::env;

use log::debug;
use once_cell::sync::Lazy;

const FALLBACK_HOSTNAME: &str = "unknown";

static LOCAL_HOSTNAME: Lazy<String> = Lazy::new(detect_hostname);

/// Hostname of the current machine, resolved once per process.
///
/// Checks the `HOSTNAME` environment variable first, then asks the operating
/// system, and falls back to `"unknown"`.
pub fn local_hostname() -> &'static str {
    LOCAL_HOSTNAME.as_str()
}

fn detect_hostname() -> String {
    if let Ok(hostname) = env::var("HOSTNAME")
        && !hostname.trim().is_empty()
    {
        return hostname.trim().to_owned();
    }
    if let Some(hostname) = system_hostname() {
        return hostname;
    }
    debug!("femtogelf: could not determine hostname, using '{FALLBACK_HOSTNAME}'");
    FALLBACK_HOSTNAME.to_owned()
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    match nix::unistd::gethostname() {
        Ok(name) => name
            .into_string()
            .ok()
            .filter(|name| !name.is_empty()),
        Err(err) => {
            debug!("femtogelf: gethostname failed: {err}");
            None
        }
    }
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
}
