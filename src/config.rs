use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::{create_dir, Repo};

/// permissions for the user identity file
const CONFIG_FILE_MODE: u32 = 0o600;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// committer identity stored in `.quill/config/user`
///
/// the file holds two `key=value` lines:
///
/// ```text
/// name=Jane Doe
/// email=jane@example.com
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl UserConfig {
    /// create a validated identity
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if name.is_empty() {
            return Err(Error::UserConfig("user name is empty".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(Error::InvalidEmail(email));
        }

        Ok(Self { name, email })
    }

    /// load the identity of a repository
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.user_config_path();
        let content = std::fs::read_to_string(&path).with_read_path(&path)?;
        Self::parse(&content)
    }

    /// parse `key=value` lines; unknown keys and malformed lines are ignored
    pub fn parse(content: &str) -> Result<Self> {
        let mut name = String::new();
        let mut email = String::new();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "name" => name = value.trim().to_string(),
                "email" => email = value.trim().to_string(),
                _ => {}
            }
        }

        if name.is_empty() || email.is_empty() {
            return Err(Error::UserConfig(
                "user name or email not found in config".to_string(),
            ));
        }

        Self::new(name, email)
    }

    /// write the identity file with owner-only permissions
    pub fn save(&self, repo: &Repo) -> Result<()> {
        let path = repo.user_config_path();
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(CONFIG_FILE_MODE)
            .open(&path)
            .with_write_path(&path)?;
        write!(file, "name={}\nemail={}\n", self.name, self.email).with_write_path(&path)?;
        Ok(())
    }

    /// author string recorded in commits
    pub fn author(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// check an address against the accepted email shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane@example.c"));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_parse_user_config() {
        let config = UserConfig::parse("name=Jane Doe\nemail=jane@example.com\n").unwrap();
        assert_eq!(config.name, "Jane Doe");
        assert_eq!(config.email, "jane@example.com");
        assert_eq!(config.author(), "Jane Doe <jane@example.com>");
    }

    #[test]
    fn test_parse_tolerates_noise() {
        let content = "# comment\n  name = Jane \nbogus\ncolor=blue\nemail= jane@example.com\n";
        let config = UserConfig::parse(content).unwrap();
        assert_eq!(config.name, "Jane");
        assert_eq!(config.email, "jane@example.com");
    }

    #[test]
    fn test_parse_missing_email() {
        let result = UserConfig::parse("name=Jane\n");
        assert!(matches!(result, Err(Error::UserConfig(_))));
    }

    #[test]
    fn test_parse_rejects_bad_email() {
        let result = UserConfig::parse("name=Jane\nemail=not-an-email\n");
        assert!(matches!(result, Err(Error::InvalidEmail(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let user = UserConfig::new("Jane", "jane@example.com").unwrap();
        let repo = Repo::init(dir.path(), &user).unwrap();

        let loaded = UserConfig::load(&repo).unwrap();
        assert_eq!(loaded, user);

        let mode = std::fs::metadata(repo.user_config_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
