//! Theme package storage and lifecycle.
//!
//! [`FileThemeStore`] keeps one directory per theme below `themes_dir`,
//! named after the theme id and holding the manifest plus assets. All disk
//! work runs on tokio's blocking pool so the event pipeline is never stalled
//! by storage. Activation is observed by the pipeline only through the shared
//! [`ActiveTheme`] slot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use island_core::config::IslandConfig;
use island_core::utils::{fs as island_fs, paths};

use super::active::ActiveTheme;
use super::assets::{self, ContentResolver, FileContentResolver, ResourceRef};
use super::errors::ThemeStoreError;
use super::events::ThemeStoreEvent;
use super::package;
use super::types::{Theme, ThemeId};

const STAGING_PREFIX: &str = ".staging-";
const THEMES_DIRNAME: &str = "themes";
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// Installs a zipped theme package and returns its id. A package with the
    /// same id is replaced.
    async fn install(&self, archive: Vec<u8>) -> Result<ThemeId, ThemeStoreError>;

    /// Makes `theme_id` the active theme. Failures are logged and leave no
    /// theme active; returns whether activation succeeded.
    async fn activate(&self, theme_id: &ThemeId) -> bool;

    async fn deactivate(&self);

    /// All stored themes, sorted by id. Unreadable packages are skipped.
    async fn list(&self) -> Result<Vec<Theme>, ThemeStoreError>;

    /// Removes a theme. Returns `false` if it did not exist.
    async fn delete(&self, theme_id: &ThemeId) -> Result<bool, ThemeStoreError>;

    /// Writes the manifest of an authored or edited theme.
    async fn save(&self, theme: &Theme) -> Result<(), ThemeStoreError>;

    /// Zips a stored theme for sharing; `None` if it does not exist.
    async fn export(&self, theme_id: &ThemeId) -> Result<Option<Vec<u8>>, ThemeStoreError>;

    /// Loads image bytes for a theme resource reference. Presets and any
    /// failure yield `None`.
    async fn resolve_asset(&self, theme_id: &ThemeId, reference: &str) -> Option<Vec<u8>>;
}

async fn run_blocking<T, F>(task: F) -> Result<T, ThemeStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ThemeStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ThemeStoreError::TaskFailed(e.to_string()))?
}

pub struct FileThemeStore {
    themes_dir: PathBuf,
    active: Arc<ActiveTheme>,
    content_resolver: Arc<dyn ContentResolver>,
    event_sender: broadcast::Sender<ThemeStoreEvent>,
    /// Serializes mutations and activation so none of them sees a half-applied change.
    write_lock: Mutex<()>,
}

impl FileThemeStore {
    pub fn new(themes_dir: impl Into<PathBuf>, active: Arc<ActiveTheme>) -> Self {
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            themes_dir: themes_dir.into(),
            active,
            content_resolver: Arc::new(FileContentResolver),
            event_sender,
            write_lock: Mutex::new(()),
        }
    }

    /// Uses `config.themes_dir`, or `<app data dir>/themes` when unset.
    pub fn from_config(config: &IslandConfig, active: Arc<ActiveTheme>) -> Result<Self, ThemeStoreError> {
        let themes_dir = match &config.themes_dir {
            Some(dir) => dir.clone(),
            None => paths::get_app_data_dir()?.join(THEMES_DIRNAME),
        };
        Ok(Self::new(themes_dir, active))
    }

    pub fn with_content_resolver(mut self, resolver: Arc<dyn ContentResolver>) -> Self {
        self.content_resolver = resolver;
        self
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    pub fn active(&self) -> &Arc<ActiveTheme> {
        &self.active
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeStoreEvent> {
        self.event_sender.subscribe()
    }

    /// Activates the configured startup theme, if any.
    pub async fn restore_active(&self, theme_id: Option<&str>) -> bool {
        match theme_id {
            Some(id) => self.activate(&ThemeId::new(id)).await,
            None => false,
        }
    }

    fn notify(&self, event: ThemeStoreEvent) {
        // No subscribers is fine.
        let _ = self.event_sender.send(event);
    }

    /// Reads one stored theme. The directory name wins over the manifest id.
    pub async fn load(&self, theme_id: &ThemeId) -> Result<Theme, ThemeStoreError> {
        let package_dir = self
            .package_dir(theme_id)
            .ok_or_else(|| ThemeStoreError::InvalidThemeId(theme_id.to_string()))?;
        let id = theme_id.clone();
        run_blocking(move || {
            if !package_dir.is_dir() {
                return Err(ThemeStoreError::ThemeNotFound { theme_id: id });
            }
            let mut theme = package::read_manifest(&package_dir)?;
            theme.id = id;
            Ok(theme)
        })
        .await
    }

    fn package_dir(&self, theme_id: &ThemeId) -> Option<PathBuf> {
        if theme_id.is_filesystem_safe() {
            Some(self.themes_dir.join(theme_id.as_str()))
        } else {
            None
        }
    }
}

/// Stages, validates and moves a package into place. The staging directory
/// is a `TempDir`, so it is removed on every return path.
fn install_blocking(themes_dir: &Path, archive: &[u8]) -> Result<Theme, ThemeStoreError> {
    island_fs::ensure_dir_exists(themes_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(themes_dir)
        .map_err(|e| ThemeStoreError::storage_io("Failed to create staging directory", themes_dir, e))?;
    let package_dir = staging.path().join("package");
    fs::create_dir(&package_dir)
        .map_err(|e| ThemeStoreError::storage_io("Failed to create staging directory", &package_dir, e))?;

    package::extract_archive(archive, &package_dir)?;
    let mut theme = package::read_manifest(&package_dir)?;

    let id = if theme.id.is_empty() {
        ThemeId::generate()
    } else {
        ThemeId::sanitize(theme.id.as_str()).unwrap_or_else(ThemeId::generate)
    };
    if id != theme.id {
        debug!("Package declared id '{}', storing as '{}'", theme.id, id);
        theme.id = id.clone();
        package::write_manifest(&package_dir, &theme)?;
    }

    let final_dir = themes_dir.join(id.as_str());
    replace_dir(&package_dir, &final_dir, staging.path())?;
    Ok(theme)
}

/// Moves `new_dir` to `final_dir`. An existing `final_dir` is parked in
/// `scratch` first and restored if the move fails.
fn replace_dir(new_dir: &Path, final_dir: &Path, scratch: &Path) -> Result<(), ThemeStoreError> {
    if !final_dir.exists() {
        return island_fs::move_dir(new_dir, final_dir).map_err(ThemeStoreError::from);
    }
    let backup = scratch.join("previous");
    fs::rename(final_dir, &backup)
        .map_err(|e| ThemeStoreError::storage_io("Failed to move existing package aside", final_dir, e))?;
    match island_fs::move_dir(new_dir, final_dir) {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Err(restore_err) = fs::rename(&backup, final_dir) {
                warn!("Failed to restore previous package at {:?}: {}", final_dir, restore_err);
            }
            Err(e.into())
        }
    }
}

fn list_blocking(themes_dir: &Path) -> Result<Vec<Theme>, ThemeStoreError> {
    let entries = match fs::read_dir(themes_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ThemeStoreError::storage_io("Failed to read themes directory", themes_dir, e)),
    };

    let mut themes = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", themes_dir, e);
                continue;
            }
        };
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if dir_name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        match package::read_manifest(&entry.path()) {
            Ok(mut theme) => {
                // The directory name is the storage key.
                theme.id = ThemeId::new(dir_name);
                themes.push(theme);
            }
            Err(e) => warn!("Skipping theme package {:?}: {}", entry.path(), e),
        }
    }
    themes.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(themes)
}

#[async_trait]
impl ThemeStore for FileThemeStore {
    async fn install(&self, archive: Vec<u8>) -> Result<ThemeId, ThemeStoreError> {
        let _guard = self.write_lock.lock().await;
        let themes_dir = self.themes_dir.clone();
        let theme = run_blocking(move || install_blocking(&themes_dir, &archive)).await?;
        info!(theme_id = %theme.id, "Installed theme '{}'", theme.meta.name);

        if self.active.is_active(&theme.id) {
            self.active.publish(theme.clone());
        }
        self.notify(ThemeStoreEvent::Installed(theme.id.clone()));
        Ok(theme.id)
    }

    async fn activate(&self, theme_id: &ThemeId) -> bool {
        // Held across load and publish so a concurrent delete or save cannot
        // be overtaken by a stale read.
        let _guard = self.write_lock.lock().await;
        match self.load(theme_id).await {
            Ok(theme) => {
                self.active.publish(theme);
                info!(theme_id = %theme_id, "Activated theme");
                self.notify(ThemeStoreEvent::Activated(theme_id.clone()));
                true
            }
            Err(e) => {
                warn!(theme_id = %theme_id, "Failed to activate theme, falling back to defaults: {}", e);
                self.active.clear();
                self.notify(ThemeStoreEvent::Deactivated);
                false
            }
        }
    }

    async fn deactivate(&self) {
        let _guard = self.write_lock.lock().await;
        self.active.clear();
        debug!("Theme deactivated");
        self.notify(ThemeStoreEvent::Deactivated);
    }

    async fn list(&self) -> Result<Vec<Theme>, ThemeStoreError> {
        let themes_dir = self.themes_dir.clone();
        run_blocking(move || list_blocking(&themes_dir)).await
    }

    async fn delete(&self, theme_id: &ThemeId) -> Result<bool, ThemeStoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(package_dir) = self.package_dir(theme_id) else {
            return Err(ThemeStoreError::InvalidThemeId(theme_id.to_string()));
        };
        let existed = run_blocking(move || {
            if !package_dir.is_dir() {
                return Ok(false);
            }
            island_fs::remove_dir_if_exists(&package_dir)?;
            Ok(true)
        })
        .await?;
        if existed {
            info!(theme_id = %theme_id, "Deleted theme");
        }
        if self.active.clear_if(theme_id) {
            self.notify(ThemeStoreEvent::Deactivated);
        }
        if existed {
            self.notify(ThemeStoreEvent::Deleted(theme_id.clone()));
        }
        Ok(existed)
    }

    async fn save(&self, theme: &Theme) -> Result<(), ThemeStoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(package_dir) = self.package_dir(&theme.id) else {
            return Err(ThemeStoreError::InvalidThemeId(theme.id.to_string()));
        };
        let to_write = theme.clone();
        run_blocking(move || package::write_manifest(&package_dir, &to_write)).await?;
        debug!(theme_id = %theme.id, "Saved theme manifest");

        if self.active.is_active(&theme.id) {
            self.active.publish(theme.clone());
        }
        self.notify(ThemeStoreEvent::Saved(theme.id.clone()));
        Ok(())
    }

    async fn export(&self, theme_id: &ThemeId) -> Result<Option<Vec<u8>>, ThemeStoreError> {
        let Some(package_dir) = self.package_dir(theme_id) else {
            return Ok(None);
        };
        run_blocking(move || {
            if !package_dir.join(package::MANIFEST_FILE).is_file() {
                return Ok(None);
            }
            package::archive_directory(&package_dir).map(Some)
        })
        .await
    }

    async fn resolve_asset(&self, theme_id: &ThemeId, reference: &str) -> Option<Vec<u8>> {
        let parsed = match ResourceRef::parse(reference) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Unresolvable asset reference: {}", e);
                return None;
            }
        };
        let bytes = match parsed {
            ResourceRef::Preset(name) => {
                debug!("Asset '{}' is a built-in preset; renderer supplies it", name);
                return None;
            }
            ResourceRef::External(uri) => match self.content_resolver.open(&uri).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Failed to open external asset '{}': {}", uri, e);
                    return None;
                }
            },
            ResourceRef::ThemeFile(relative) => {
                let package_dir = self.package_dir(theme_id)?;
                match assets::read_theme_file(&package_dir, &relative).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(theme_id = %theme_id, "{}", e);
                        return None;
                    }
                }
            }
        };

        let reference = reference.to_string();
        match tokio::task::spawn_blocking(move || assets::verify_image(&reference, bytes)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(theme_id = %theme_id, "{}", e);
                None
            }
            Err(e) => {
                warn!("Asset decode task failed: {}", e);
                None
            }
        }
    }
}
