use url::Url;

use crate::registry::{TargetAddress, TargetConfig, DEFAULT_CLIENT_NAME, DEFAULT_TIMEOUT};
use crate::types::TargetSection;
use crate::validate::validator::{Validator, CLIENT_NAME_RE, QUEUE_RE};

pub(crate) fn lower_target(
    v: &mut Validator,
    section: Option<&TargetSection>,
) -> Option<TargetConfig> {
    let Some(section) = section else {
        v.push("target", "is required");
        return None;
    };

    let address = match section.address.as_deref() {
        Some(raw) => parse_address(v, "target.address", raw),
        None => {
            v.push("target.address", "is required");
            None
        }
    };

    let client_name = match section.client_name.as_deref() {
        Some(name) if CLIENT_NAME_RE.is_match(name) => Some(name.to_string()),
        Some(_) => {
            v.push(
                "target.clientName",
                "must match regex ^[A-Za-z0-9_\\.\\-]+$",
            );
            None
        }
        None => Some(DEFAULT_CLIENT_NAME.to_string()),
    };

    let timeout = match &section.timeout {
        Some(value) => match v.duration("target.timeout", value) {
            Some(d) if d.is_zero() => {
                v.push("target.timeout", "must be greater than zero");
                None
            }
            other => other,
        },
        None => Some(DEFAULT_TIMEOUT),
    };

    Some(TargetConfig {
        address: address?,
        client_name: client_name?,
        timeout: timeout?,
    })
}

pub(crate) fn parse_address(v: &mut Validator, path: &str, raw: &str) -> Option<TargetAddress> {
    let url = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(e) => {
            v.push(path, format!("invalid URL: {e}"));
            return None;
        }
    };

    match url.scheme() {
        "memory" => {
            let mut failure_rate = 0.0;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "failure_rate" => match value.parse::<f64>() {
                        Ok(rate) if (0.0..=1.0).contains(&rate) => failure_rate = rate,
                        _ => {
                            v.push(path, "failure_rate must be a number between 0 and 1");
                            return None;
                        }
                    },
                    other => {
                        v.push(path, format!("unknown memory target option: {other}"));
                        return None;
                    }
                }
            }
            Some(TargetAddress::Memory { failure_rate })
        }
        "ns" => {
            let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
                v.push(path, "ns:// address requires a host");
                return None;
            };
            let Some(port) = url.port() else {
                v.push(path, "ns:// address requires a port");
                return None;
            };
            let queue = url.path().trim_start_matches('/');
            if !QUEUE_RE.is_match(queue) {
                v.push(
                    path,
                    "ns:// address requires a queue name matching ^[A-Za-z0-9_\\-]+$ as its path",
                );
                return None;
            }
            Some(TargetAddress::NetSchedule {
                host: host.to_string(),
                port,
                queue: queue.to_string(),
            })
        }
        other => {
            v.push(
                path,
                format!("unsupported scheme {other:?} (expected memory or ns)"),
            );
            None
        }
    }
}
