//! Template loading and fault-isolated execution.
//!
//! Templates are [minijinja] sources. A [`TemplateSet`] keeps them in
//! execution order and renders one at a time into a caller-owned buffer.
//! Rendering never unwinds past [`TemplateSet::execute`]: errors and panics
//! raised while a template runs are both returned as [`Error`] values.
//! A panic inside a template is not printed by the panic hook either; it is
//! reported only through the returned error.

use std::{
    any::Any,
    cell::Cell,
    panic::{self, AssertUnwindSafe, catch_unwind},
    path::Path,
    sync::Once,
};

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use tablegen_core::{Table, to_camel_case, to_pascal_case, to_snake_case};

use crate::{Error, Result};

thread_local! {
    static RENDERING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PANIC_HOOK: Once = Once::new();

/// Wrap the process panic hook so it stays silent for panics raised on a
/// thread that is inside [`TemplateSet::execute`].
fn install_quiet_panic_hook() {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if RENDERING.with(Cell::get) {
                tracing::debug!(location = ?info.location(), "template panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// File extension of template sources.
pub const TEMPLATE_EXTENSION: &str = "tpl";

/// An ordered, read-only collection of templates.
///
/// A set is `Sync`: once loaded it can serve concurrent assemblies, each
/// rendering into its own buffer.
pub struct TemplateSet {
    env: Environment<'static>,
    names: Vec<String>,
}

impl TemplateSet {
    /// Create an empty set with the standard helpers registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        env.add_filter("pascal", |value: &str| to_pascal_case(value));
        env.add_filter("camel", |value: &str| to_camel_case(value));
        env.add_filter("snake", |value: &str| to_snake_case(value));

        Self {
            env,
            names: Vec::new(),
        }
    }

    /// Load every `*.tpl` file of a directory, ordered by file name.
    ///
    /// Subdirectories are ignored; they hold other template groups.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load_err = |source| Error::TemplateLoad {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(load_err)? {
            let path = entry.map_err(load_err)?.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == TEMPLATE_EXTENSION)
            {
                files.push(path);
            }
        }
        files.sort();

        let mut set = Self::new();
        for path in files {
            let source = std::fs::read_to_string(&path).map_err(|source| Error::TemplateLoad {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            set.add(name, source)?;
        }

        tracing::debug!(dir = %dir.display(), count = set.len(), "loaded templates");
        Ok(set)
    }

    /// Like [`TemplateSet::from_dir`], but a missing directory yields an
    /// empty set.
    pub fn from_dir_if_exists(dir: &Path) -> Result<Self> {
        if dir.is_dir() {
            Self::from_dir(dir)
        } else {
            Ok(Self::new())
        }
    }

    /// Add a template. Templates run in the order they were added; adding a
    /// name twice replaces the source and keeps the original position.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|source| Error::Template {
                name: name.clone(),
                source,
            })?;
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        Ok(())
    }

    /// Builder form of [`TemplateSet::add`].
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        self.add(name, source)?;
        Ok(self)
    }

    /// Template names in execution order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check if the set holds no templates.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Access the environment to register extra filters and functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Render the named template into `out`.
    ///
    /// On failure `out` may hold partial output; callers discard it.
    pub fn execute<S: Serialize>(&self, name: &str, context: &S, out: &mut Vec<u8>) -> Result<()> {
        tracing::trace!(template = name, "executing template");

        install_quiet_panic_hook();
        let was_rendering = RENDERING.replace(true);
        let rendered = catch_unwind(AssertUnwindSafe(|| {
            let template = self.env.get_template(name)?;
            template.render_to_write(context, &mut *out).map(|_| ())
        }));
        RENDERING.set(was_rendering);

        match rendered {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(Error::Template {
                name: name.to_string(),
                source,
            }),
            Err(payload) => Err(Error::TemplatePanic {
                name: name.to_string(),
                payload: panic_message(payload.as_ref()),
            }),
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSet")
            .field("names", &self.names)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Context handed to every template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData<'a> {
    /// Package/namespace of the generated files.
    pub package: &'a str,
    /// Target dialect name (e.g. "go").
    pub dialect: &'static str,
    /// The table being generated; absent for singleton templates.
    pub table: Option<&'a Table>,
    /// Every table of the schema.
    pub tables: &'a [Table],
}
