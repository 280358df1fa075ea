//! Bucket profiles
//!
//! A profile is a named bucket location stored in the configuration file, so a
//! bucket can be selected with `--profile mixes` instead of repeating its name and
//! region on every invocation.

use serde::{Deserialize, Serialize};

use crate::bucket::BucketConfig;
use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// A named bucket location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Bucket name
    pub bucket_name: String,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible stores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        bucket_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket_name: bucket_name.into(),
            region: region.into(),
            endpoint: None,
        }
    }

    /// The bucket location this profile names
    pub fn bucket_config(&self) -> BucketConfig {
        BucketConfig {
            bucket_name: self.bucket_name.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        profile.bucket_config().validate()?;
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        if config.default_profile.as_deref() == Some(name) {
            config.default_profile = None;
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }

    /// Make `name` the profile used when none is given
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        if !config.profiles.iter().any(|p| p.name == name) {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        config.default_profile = Some(name.to_string());
        self.config_manager.save(&config)
    }

    /// The default profile name, if one is set
    pub fn default_name(&self) -> Result<Option<String>> {
        Ok(self.config_manager.load()?.default_profile)
    }

    /// Bucket for `name`, or the default profile, or the placeholder
    ///
    /// An explicitly named profile must exist. A stale default (pointing at a removed
    /// profile) falls through to the placeholder, which puts the session in preview mode.
    pub fn resolve(&self, name: Option<&str>) -> Result<BucketConfig> {
        if let Some(name) = name {
            return Ok(self.get(name)?.bucket_config());
        }

        let config = self.config_manager.load()?;
        let bucket = config
            .default_profile
            .as_deref()
            .and_then(|default| config.profiles.iter().find(|p| p.name == default))
            .map(Profile::bucket_config)
            .unwrap_or_else(BucketConfig::placeholder);
        Ok(bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_profile_manager() -> (ProfileManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let profile_manager = ProfileManager::with_config_manager(config_manager);
        (profile_manager, temp_dir)
    }

    #[test]
    fn test_profile_bucket_config() {
        let mut profile = Profile::new("mixes", "tasty-mixes", "eu-west-1");
        profile.endpoint = Some("http://localhost:9000".into());
        let bucket = profile.bucket_config();
        assert_eq!(bucket.bucket_name, "tasty-mixes");
        assert_eq!(bucket.region, "eu-west-1");
        assert_eq!(bucket.endpoint.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager
            .set(Profile::new("mixes", "tasty-mixes", "us-east-1"))
            .unwrap();

        let retrieved = manager.get("mixes").unwrap();
        assert_eq!(retrieved.bucket_name, "tasty-mixes");
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn test_set_rejects_invalid_endpoint() {
        let (manager, _temp_dir) = temp_profile_manager();
        let mut profile = Profile::new("bad", "tasty-mixes", "us-east-1");
        profile.endpoint = Some("::nope::".into());
        assert!(manager.set(profile).is_err());
        assert!(!manager.exists("bad").unwrap());
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::new("p", "old", "us-east-1")).unwrap();
        manager.set(Profile::new("p", "new", "us-east-1")).unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].bucket_name, "new");
    }

    #[test]
    fn test_remove_clears_default() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::new("p", "b", "us-east-1")).unwrap();
        manager.set_default("p").unwrap();
        assert_eq!(manager.default_name().unwrap().as_deref(), Some("p"));

        manager.remove("p").unwrap();
        assert!(manager.default_name().unwrap().is_none());
    }

    #[test]
    fn test_remove_and_default_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        assert!(matches!(
            manager.remove("nonexistent"),
            Err(Error::ProfileNotFound(_))
        ));
        assert!(matches!(
            manager.set_default("nonexistent"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_order() {
        let (manager, _temp_dir) = temp_profile_manager();

        assert_eq!(manager.resolve(None).unwrap(), BucketConfig::placeholder());

        manager.set(Profile::new("a", "bucket-a", "us-east-1")).unwrap();
        manager.set(Profile::new("b", "bucket-b", "eu-west-1")).unwrap();
        assert_eq!(manager.resolve(None).unwrap(), BucketConfig::placeholder());

        manager.set_default("b").unwrap();
        assert_eq!(manager.resolve(None).unwrap().bucket_name, "bucket-b");
        assert_eq!(manager.resolve(Some("a")).unwrap().bucket_name, "bucket-a");
        assert!(matches!(
            manager.resolve(Some("missing")),
            Err(Error::ProfileNotFound(_))
        ));
    }
}
