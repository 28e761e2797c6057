//! Settings loading and io-provider registration.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fma_core::kernel::constants::CONFIG_FILE_NAME;
use fma_core::kernel::error::{Error, Result};
use fma_core::storage::{BackendKind, ConfigManager, ProviderSettings, load_config_file};
use fma_core::{ConfigFormat, IoProvider, LocalStorageProvider, ProviderRegistry, Settings, StorageProvider};
use fma_io_desktop::DesktopProvider;
use fma_io_document::DocumentProvider;
use fma_io_keytree::KeyTreeProvider;
use log::{debug, info};

/// Settings plus the directory their relative paths are resolved against
pub struct Setup {
    /// Provider paths are already joined onto `base`
    pub settings: Settings,
    pub base: PathBuf,
    pub storage: Arc<dyn StorageProvider>,
}

impl Setup {
    /// Load `file`, or `fma.toml` from the working directory when absent.
    ///
    /// A missing default file yields the default settings; a missing
    /// explicit file is an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let (base, config) = match file {
            Some(file) => {
                let base = file.parent().map(Path::to_path_buf).unwrap_or_default();
                let storage = LocalStorageProvider::new(base.clone());
                let name = file.file_name().map(PathBuf::from).unwrap_or_default();
                (base, load_config_file(&storage, &name)?)
            }
            None => {
                let base = std::env::current_dir().map_err(|e| Error::io(e, "current_dir", PathBuf::from(".")))?;
                let manager = ConfigManager::new(
                    Arc::new(LocalStorageProvider::new(base.clone())),
                    PathBuf::new(),
                    ConfigFormat::Toml,
                );
                (base, manager.load_config(CONFIG_FILE_NAME)?)
            }
        };

        let mut settings = Settings::from_config(&config)?;
        settings.resolve_paths(&base);
        debug!("{} io-provider(s) configured from {}", settings.providers.len(), base.display());
        // Provider paths now carry the base; storage resolves them as given.
        let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::new(PathBuf::new()));
        Ok(Self { settings, base, storage })
    }

    /// Instantiate and register every configured io-provider
    pub fn registry(&self) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for entry in &self.settings.providers {
            let provider = self.build(entry)?;
            registry.register(provider, entry.priority)?;
            info!("registered {} io-provider '{}' at {}", entry.backend, entry.id, entry.path.display());
        }
        Ok(registry)
    }

    fn build(&self, entry: &ProviderSettings) -> Result<Box<dyn IoProvider>> {
        let storage = Arc::clone(&self.storage);
        let provider: Box<dyn IoProvider> = match entry.backend {
            BackendKind::Desktop => Box::new(
                DesktopProvider::new(&entry.id, storage, entry.path.clone())
                    .with_locale(self.settings.locale.clone())
                    .read_only(entry.readonly),
            ),
            BackendKind::Document => {
                let format = document_format(entry.format.as_deref())?;
                Box::new(DocumentProvider::new(&entry.id, storage, entry.path.clone(), format).read_only(entry.readonly))
            }
            BackendKind::Keytree => {
                Box::new(KeyTreeProvider::new(&entry.id, storage, entry.path.clone())?.mandatory(entry.readonly))
            }
        };
        Ok(provider)
    }
}

/// Document format from its name, JSON when unset
pub fn document_format(name: Option<&str>) -> Result<ConfigFormat> {
    match name {
        None => Ok(ConfigFormat::Json),
        Some(name) => ConfigFormat::from_name(name).ok_or_else(|| Error::Other(format!("unknown document format '{}'", name))),
    }
}
