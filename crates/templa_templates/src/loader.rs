//! Template loading from the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::TemplateResult;
use crate::template::TemplateEnvironment;

/// Loads every file below a directory into a [`TemplateEnvironment`].
///
/// Templates are named by their path relative to the root, with `/` as the
/// separator on every platform, so `root/k8s/deployment.yaml` becomes
/// `k8s/deployment.yaml`.
pub struct TemplateLoader {
    templates_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new template loader.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
        }
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    /// Load all templates below the templates directory.
    ///
    /// Hidden files and directories are skipped and symlinks are followed. A
    /// missing directory yields an empty environment; any other walk failure,
    /// such as an unreadable directory or a symlink loop, is an error.
    pub fn load_all(&self) -> TemplateResult<TemplateEnvironment> {
        if !self.templates_path.exists() {
            warn!("Templates directory does not exist: {:?}", self.templates_path);
            return Ok(TemplateEnvironment::new());
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let name = self.template_name(path);
            debug!("Loading template {} from {:?}", name, path);
            sources.push((name, fs::read_to_string(path)?));
        }

        let environment = TemplateEnvironment::from_sources(sources)?;
        info!(
            "Loaded {} templates from {:?}",
            environment.template_names().len(),
            self.templates_path
        );
        Ok(environment)
    }

    fn template_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.templates_path).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn walk_error(error: walkdir::Error) -> io::Error {
    let message = error.to_string();
    error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

impl TemplateEnvironment {
    /// Load every template below `path`. See [`TemplateLoader`].
    pub fn from_dir(path: impl Into<PathBuf>) -> TemplateResult<Self> {
        TemplateLoader::new(path).load_all()
    }
}
