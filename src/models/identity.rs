use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// What a lookup is about: a single account, or one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User(String),
    Repo { owner: String, repo: String },
}

impl Identity {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Validation("identity must not be empty".to_string()));
        }

        match input.split_once('/') {
            None => {
                validate_segment(input, "username")?;
                Ok(Identity::User(input.to_string()))
            }
            Some((owner, repo)) => {
                if repo.contains('/') {
                    return Err(Error::Validation(format!(
                        "expected owner/repo, got '{}'",
                        input
                    )));
                }
                validate_segment(owner, "owner")?;
                validate_segment(repo, "repository name")?;
                Ok(Identity::Repo {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
        }
    }

    pub fn username(input: &str) -> Result<String> {
        match Self::parse(input)? {
            Identity::User(login) => Ok(login),
            Identity::Repo { .. } => Err(Error::Validation(format!(
                "expected a username, got repository '{}'",
                input.trim()
            ))),
        }
    }

    pub fn owner_repo(input: &str) -> Result<(String, String)> {
        match Self::parse(input)? {
            Identity::Repo { owner, repo } => Ok((owner, repo)),
            Identity::User(_) => Err(Error::Validation(format!(
                "expected owner/repo, got '{}'",
                input.trim()
            ))),
        }
    }
}

// Segments are interpolated into URL paths, so anything that could act as a
// separator, query or fragment is rejected.
fn validate_segment(segment: &str, what: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", what)));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(Error::Validation(format!(
            "{} '{}' contains invalid character '{}'",
            what, segment, bad
        )));
    }
    if segment == "." || segment == ".." {
        return Err(Error::Validation(format!("{} '{}' is not allowed", what, segment)));
    }
    Ok(())
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::User(login) => write!(f, "{}", login),
            Identity::Repo { owner, repo } => write!(f, "{}/{}", owner, repo),
        }
    }
}

/// Personal access token passed through to GitHub.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns `None` for blank input so an empty env var means anonymous access.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn authorization_value(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_username() {
        assert_eq!(
            Identity::parse("  octocat ").unwrap(),
            Identity::User("octocat".to_string())
        );
        assert_eq!(Identity::username("octo-cat_1").unwrap(), "octo-cat_1");
    }

    #[test]
    fn test_parse_owner_repo() {
        assert_eq!(
            Identity::parse("rust-lang/rust").unwrap(),
            Identity::Repo {
                owner: "rust-lang".to_string(),
                repo: "rust".to_string()
            }
        );
        let (owner, repo) = Identity::owner_repo("serde-rs/serde.rs").unwrap();
        assert_eq!(owner, "serde-rs");
        assert_eq!(repo, "serde.rs");
    }

    #[test]
    fn test_rejects_malformed_identities() {
        for input in ["", "   ", "/repo", "owner/", "a/b/c", "user?x=1", "us er", "../etc", "a/.."] {
            assert!(
                matches!(Identity::parse(input), Err(Error::Validation(_))),
                "expected validation error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_kind_mismatch_is_validation_error() {
        assert!(matches!(Identity::username("a/b"), Err(Error::Validation(_))));
        assert!(matches!(Identity::owner_repo("octocat"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_access_token() {
        assert!(AccessToken::new("").is_none());
        assert!(AccessToken::new("  ").is_none());
        let token = AccessToken::new("ghp_secret").unwrap();
        assert_eq!(token.authorization_value(), "token ghp_secret");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
    }
}
