//! Line protocol spoken to a NetSchedule-style queue server.
//!
//! Requests are single text lines. Each request gets exactly one reply line, either
//! `OK:<payload>` or `ERR:<code>:<message>`. Structured payloads are url-encoded pairs.

use std::collections::HashMap;

use crate::client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok(String),
    Err { code: String, message: String },
}

impl Reply {
    pub fn into_result(self) -> Result<String, ClientError> {
        match self {
            Reply::Ok(payload) => Ok(payload),
            Reply::Err { code, message } => Err(ClientError::Service { code, message }),
        }
    }
}

pub fn parse_reply(line: &str) -> Result<Reply, ClientError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(payload) = line.strip_prefix("OK:") {
        return Ok(Reply::Ok(payload.to_string()));
    }
    if let Some(rest) = line.strip_prefix("ERR:") {
        let (code, message) = rest.split_once(':').unwrap_or((rest, ""));
        return Ok(Reply::Err {
            code: code.to_string(),
            message: message.to_string(),
        });
    }
    Err(ClientError::Protocol(format!("unexpected reply line {line:?}")))
}

/// Quote a value for use as `name="value"` in a request line.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Decode `a=1&b=2` reply payloads.
pub fn parse_pairs(payload: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(payload.as_bytes())
        .into_owned()
        .collect()
}

pub fn handshake(client_name: &str, queue: &str) -> [String; 2] {
    [format!("client={client_name}"), queue.to_string()]
}

pub fn submit(input: &str) -> String {
    format!("SUBMIT input={}", quote(input))
}

pub fn cancel_job(job_key: &str) -> String {
    format!("CANCEL job_key={job_key}")
}

pub fn cancel_group(group: &str) -> String {
    format!("CANCEL group={group}")
}

/// `BSUB` opens batch mode, `BTCH` announces the size, and `ENDB` closes it.
pub fn batch_submit(group: &str, inputs: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(inputs.len() + 3);
    lines.push(format!("BSUB group={group}"));
    lines.push(format!("BTCH {}", inputs.len()));
    lines.extend(inputs.iter().map(|i| format!("input={}", quote(i))));
    lines.push("ENDB".to_string());
    lines
}

pub fn get() -> String {
    "GET".to_string()
}

pub fn put(job_key: &str, output: &str) -> String {
    format!("PUT job_key={job_key} job_return_code=0 output={}", quote(output))
}

pub fn read(job_key: &str) -> String {
    format!("READ job_key={job_key}")
}

pub fn confirm(job_key: &str, auth_token: &str) -> String {
    format!("CFRM job_key={job_key} auth_token={auth_token}")
}
