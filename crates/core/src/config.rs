//! Site runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services that
//! need it. Nothing in this crate reads process environment variables directly: callers hand in
//! a lookup function (normally `std::env::var`) so request handling and tests never depend on
//! process-wide state.

use crate::constants::{
    CATALOG_FILE, DEFAULT_BIND_ADDR, DEFAULT_SITE_NAME, DEFAULT_STATIC_DIR, SITE_FILE,
};
use crate::{CatalogError, CatalogResult};
use clinic_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Environment variable naming the bind address.
pub const ENV_ADDR: &str = "CLINIC_ADDR";
/// Environment variable overriding the catalog file.
pub const ENV_CATALOG_PATH: &str = "CLINIC_CATALOG_PATH";
/// Environment variable overriding the site content file.
pub const ENV_SITE_PATH: &str = "CLINIC_SITE_PATH";
/// Environment variable naming the static asset directory.
pub const ENV_STATIC_DIR: &str = "CLINIC_STATIC_DIR";
/// Environment variable naming the site.
pub const ENV_SITE_NAME: &str = "CLINIC_SITE_NAME";

/// Site configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    bind_addr: String,
    catalog_path: Option<PathBuf>,
    site_path: Option<PathBuf>,
    static_dir: PathBuf,
    site_name: NonEmptyText,
}

impl SiteConfig {
    /// Create a new `SiteConfig`.
    ///
    /// `catalog_path` / `site_path` of `None` select the built-in data embedded in the crate.
    pub fn new(
        bind_addr: impl Into<String>,
        catalog_path: Option<PathBuf>,
        site_path: Option<PathBuf>,
        static_dir: PathBuf,
        site_name: NonEmptyText,
    ) -> CatalogResult<Self> {
        let bind_addr = bind_addr.into();
        if bind_addr.trim().is_empty() {
            return Err(CatalogError::InvalidInput(
                "bind address cannot be empty".into(),
            ));
        }

        Ok(Self {
            bind_addr,
            catalog_path,
            site_path,
            static_dir,
            site_name,
        })
    }

    /// Resolve configuration from a key lookup, typically `|k| std::env::var(k).ok()`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidInput`] if an override path is set but is not a file, or
    /// if the site name is set to whitespace.
    pub fn from_lookup<F>(lookup: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = non_blank(ENV_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let catalog_path =
            resolve_data_file(non_blank(ENV_CATALOG_PATH).map(PathBuf::from), CATALOG_FILE)?;
        let site_path = resolve_data_file(non_blank(ENV_SITE_PATH).map(PathBuf::from), SITE_FILE)?;
        let static_dir = non_blank(ENV_STATIC_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let site_name = match lookup(ENV_SITE_NAME) {
            Some(name) => NonEmptyText::new(name)?,
            None => NonEmptyText::new(DEFAULT_SITE_NAME)?,
        };

        Self::new(bind_addr, catalog_path, site_path, static_dir, site_name)
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    pub fn site_path(&self) -> Option<&Path> {
        self.site_path.as_deref()
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn site_name(&self) -> &str {
        self.site_name.as_str()
    }
}

/// Resolve a data file without reading environment variables.
///
/// If `override_path` is provided it must be an existing file. Otherwise `relative` is searched
/// for relative to the current working directory and then in every ancestor of this crate's
/// manifest directory. `Ok(None)` means nothing was found and the built-in copy should be used.
pub fn resolve_data_file(
    override_path: Option<PathBuf>,
    relative: &str,
) -> CatalogResult<Option<PathBuf>> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(Some(path));
        }
        return Err(CatalogError::InvalidInput(format!(
            "data file override is not a file: {}",
            path.display()
        )));
    }

    let cwd_relative = PathBuf::from(relative);
    if cwd_relative.is_file() {
        return Ok(Some(cwd_relative));
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(relative);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}
