pub mod mock_forge;

pub use mock_forge::{MergeCall, MockForge};

use reviewer::RepositoryConfig;

pub fn repository(username: &str, name: &str, enabled: bool, required: i64) -> RepositoryConfig {
    RepositoryConfig {
        name: name.to_string(),
        username: username.to_string(),
        enabled,
        required_score: required,
    }
}
