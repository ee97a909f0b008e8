use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// How many packages a generator runs before it stops on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagesCount {
    Finite(u64),
    Unlimited,
}

impl PackagesCount {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, PackagesCount::Unlimited)
    }

    /// True while another package may still run after `packages_run` completed ones.
    pub fn allows(&self, packages_run: u64) -> bool {
        match self {
            PackagesCount::Unlimited => true,
            PackagesCount::Finite(n) => packages_run < *n,
        }
    }

    pub fn limit(&self) -> Option<u64> {
        match self {
            PackagesCount::Unlimited => None,
            PackagesCount::Finite(n) => Some(*n),
        }
    }
}

impl fmt::Display for PackagesCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackagesCount::Finite(n) => write!(f, "{n}"),
            PackagesCount::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl Serialize for PackagesCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PackagesCount::Finite(n) => serializer.serialize_u64(*n),
            PackagesCount::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// `packagesCount` as written in a config document, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Number(i64),
    Text(String),
}

impl CountValue {
    pub fn resolve(&self) -> Result<PackagesCount, String> {
        match self {
            CountValue::Number(n) => resolve_number(*n),
            CountValue::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("unlimited") {
                    return Ok(PackagesCount::Unlimited);
                }
                match s.parse::<i64>() {
                    Ok(n) => resolve_number(n),
                    Err(_) => Err(format!(
                        "must be a positive integer or \"unlimited\" (got {s:?})"
                    )),
                }
            }
        }
    }
}

fn resolve_number(n: i64) -> Result<PackagesCount, String> {
    // -1 is the legacy "loop forever" sentinel.
    match n {
        -1 => Ok(PackagesCount::Unlimited),
        n if n > 0 => Ok(PackagesCount::Finite(n as u64)),
        n => Err(format!(
            "must be a positive integer or \"unlimited\" (got {n})"
        )),
    }
}
