//! Import a request copied from browser devtools ("Copy as cURL").
//!
//! Reusing the browser's own headers and session cookies is the most reliable way to get past
//! sites that reject unfamiliar clients, so `scrape --from-curl` and
//! `discover --curl` accept the command verbatim.

use crate::error::ConfigError;
use leadgather_scanner::FetchConfig;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Headers reqwest manages itself; copying them over breaks decoding or framing.
const MANAGED_HEADERS: &[&str] = &["host", "content-length", "accept-encoding", "connection"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurlRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl CurlRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Fold the copied headers into a fetch configuration. `User-Agent` replaces
    /// the configured agent; headers reqwest manages are dropped.
    pub fn apply_to(&self, mut config: FetchConfig) -> FetchConfig {
        for (name, value) in &self.headers {
            let lowered = name.to_ascii_lowercase();
            if lowered == "user-agent" {
                config.user_agent = value.clone();
            } else if !MANAGED_HEADERS.contains(&lowered.as_str()) {
                config.headers.push((name.clone(), value.clone()));
            }
        }
        config
    }
}

/// Flags whose value is the next argument. Anything else starting with `-` is
/// treated as a switch.
const VALUE_FLAGS: &[&str] = &[
    "-H", "--header", "-b", "--cookie", "-A", "--user-agent", "-e", "--referer", "-X",
    "--request", "-d", "--data", "--data-raw", "--data-binary", "--data-ascii",
    "--data-urlencode", "-F", "--form", "-u", "--user", "-o", "--output", "-x", "--proxy",
    "-m", "--max-time", "--connect-timeout", "--url",
];

/// Split a shell command into arguments, honouring single, double and `$'...'`
/// quoting the way devtools emits it.
fn split_arguments(command: &str) -> Result<Vec<String>, ConfigError> {
    let token_re = Regex::new(r#"\$'((?:[^'\\]|\\.)*)'|'([^']*)'|"((?:[^"\\]|\\.)*)"|(\S+)"#)
        .map_err(|e| ConfigError::Curl(e.to_string()))?;

    Ok(token_re
        .captures_iter(command)
        .filter_map(|captures| {
            captures
                .get(1)
                .map(|m| m.as_str().replace("\\'", "'"))
                .or_else(|| captures.get(2).map(|m| m.as_str().to_string()))
                .or_else(|| captures.get(3).map(|m| m.as_str().replace("\\\"", "\"")))
                .or_else(|| captures.get(4).map(|m| m.as_str().to_string()))
        })
        .collect())
}

/// Parse a "Copy as cURL" command.
///
/// The target is the first positional argument (or `--url`). `-H` values become
/// headers; `-b` cookie strings, `-A` and `-e` are folded into the matching
/// `Cookie`, `User-Agent` and `Referer` headers.
pub fn parse_curl_command(command: &str) -> Result<CurlRequest, ConfigError> {
    let command = command.replace("\\\r\n", " ").replace("\\\n", " ");
    let mut arguments = split_arguments(command.trim())?.into_iter();

    if arguments.next().as_deref() != Some("curl") {
        return Err(ConfigError::Curl("command does not start with 'curl'".to_string()));
    }

    let mut url = None;
    let mut headers = Vec::new();
    let mut cookies: Vec<String> = Vec::new();

    while let Some(argument) = arguments.next() {
        if !argument.starts_with('-') || argument == "-" {
            if url.is_none() {
                url = Some(argument);
            }
            continue;
        }
        if !VALUE_FLAGS.contains(&argument.as_str()) {
            continue;
        }

        let value = arguments
            .next()
            .ok_or_else(|| ConfigError::Curl(format!("'{}' is missing its value", argument)))?;
        match argument.as_str() {
            "-H" | "--header" => {
                if let Some((name, value)) = value.split_once(':') {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
            }
            "-b" | "--cookie" => {
                // without '=' curl reads the value as a cookie jar file
                if value.contains('=') {
                    cookies.push(value.trim().to_string());
                } else {
                    warn!("Ignoring cookie file '{}'", value);
                }
            }
            "-A" | "--user-agent" => headers.push(("User-Agent".to_string(), value)),
            "-e" | "--referer" => headers.push(("Referer".to_string(), value)),
            "--url" => url = Some(value),
            _ => {}
        }
    }

    if !cookies.is_empty() {
        headers.push(("Cookie".to_string(), cookies.join("; ")));
    }

    let url = url.ok_or_else(|| ConfigError::Curl("no URL found".to_string()))?;
    Ok(CurlRequest { url, headers })
}

/// Manual steps for finding the JSON endpoints behind a listings page.
pub fn discovery_steps(site: &str) -> String {
    format!(
        r#"MANUAL API DISCOVERY STEPS
--------------------------
1. Open {site} in Chrome
2. Press F12 to open DevTools
3. Go to the Network tab
4. Check the 'Preserve log' checkbox
5. Filter by Fetch/XHR
6. Perform a search on the website
7. Look for requests that return JSON data
8. Right-click the request -> Copy -> Copy as cURL
9. Save the command to a file and run:
     leadgather discover --curl <FILE>
   or scrape with the browser's headers:
     leadgather scrape --from-curl <FILE>
"#
    )
}
