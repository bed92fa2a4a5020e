use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::VaultResult;

/// Top-level configuration (loaded from pvault.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub storage: StorageConfig,
    pub crypto: CryptoConfig,
    pub session: SessionConfig,
    pub audit: AuditConfig,
}

impl VaultConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> VaultResult<Self> {
        if !path.exists() {
            return Ok(VaultConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the vault and registry files (default: .pvault)
    pub data_dir: PathBuf,
    /// Vault file name within data_dir
    pub vault_file: String,
    /// User-defined category registry file name within data_dir
    pub registry_file: String,
}

impl StorageConfig {
    pub fn vault_path(&self) -> PathBuf {
        self.data_dir.join(&self.vault_file)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(&self.registry_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".pvault"),
            vault_file: "vault.json".into(),
            registry_file: "categories.json".into(),
        }
    }
}

/// Key derivation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// PBKDF2-SHA256 iteration count (default: 10000)
    pub pbkdf2_iterations: u32,
    /// Application-wide KDF salt. Changing it orphans existing vault data.
    pub salt: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: 10_000,
            salt: "pocketvault-v1".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity timeout before the session key is destroyed (default: 5)
    pub timeout_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_minutes: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Emit audit events for vault operations (default: true)
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
