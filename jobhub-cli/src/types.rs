//! Command-line argument types

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Job reference typed by the user: a full UUID or an unambiguous prefix
#[derive(Debug, Clone, PartialEq)]
pub enum JobRef {
    Id(Uuid),
    /// Lowercased hex prefix, resolved against the registry's job list
    Prefix(String),
}

impl FromStr for JobRef {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(uuid) = Uuid::parse_str(input) {
            return Ok(JobRef::Id(uuid));
        }

        if input.is_empty() {
            return Err("job id must not be empty".to_string());
        }
        if !input.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Err(format!("'{}' is not a job id or id prefix", input));
        }

        Ok(JobRef::Prefix(input.to_lowercase()))
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::Id(uuid) => write!(f, "{}", uuid),
            JobRef::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(uuid.to_string().parse::<JobRef>(), Ok(JobRef::Id(uuid)));
    }

    #[test]
    fn test_parse_prefix_is_lowercased() {
        let parsed: JobRef = "3FA8".parse().unwrap();
        assert_eq!(parsed, JobRef::Prefix("3fa8".to_string()));
        assert_eq!(parsed.to_string(), "3fa8");
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!("".parse::<JobRef>().is_err());
        assert!("job-1".parse::<JobRef>().is_err());
    }
}
