use serde::{Deserialize, Serialize};

/// `GET /users/{username}` as GitHub returns it. Only the fields we reshape.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
}

impl From<GitHubUser> for UserProfile {
    fn from(user: GitHubUser) -> Self {
        Self {
            login: user.login,
            name: user.name,
            bio: user.bio,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
        }
    }
}
