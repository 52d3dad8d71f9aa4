use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a generated item should name
/// one of the xpack crates.
///
/// # Example
///
/// ```rust
/// # use xp_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("xp_pack"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested name begins with `xp_` and the caller depends on the
///    facade crate `xpack`, return `::xpack::short_name`
///    (e.g. `xp_pack` -> `::xpack::pack`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise fall back to `::crate_name`.
///
/// ## Note
/// Library code refers to itself through `crate::...`, while doctests use
/// `::crate_name`. The crate root adds `extern crate self as xp_pack;` so the
/// absolute path also resolves inside the crate.
#[derive(Debug)]
pub struct Manifest {
    manifest: Option<Document<Box<str>>>,
    modified_time: Option<SystemTime>,
}

const FACADE_NAME: &str = "xpack";
const CRATE_PREFIX: &str = "xp_";

impl Manifest {
    fn get_manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        path.exists().then_some(path)
    }

    fn get_manifest_modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn read_manifest(path: &Path) -> Option<Document<Box<str>>> {
        let text = std::fs::read_to_string(path).ok()?.into_boxed_str();
        Document::parse(text).ok()
    }

    fn absolute(name: &str) -> syn::Path {
        let ident = syn::Ident::new(name, Span::call_site());
        let mut path = syn::Path::from(ident);
        path.leading_colon = Some(Default::default());
        path
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(name));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            let mut path = Self::absolute(FACADE_NAME);
            path.segments
                .push(syn::Ident::new(module, Span::call_site()).into());
            return Some(path);
        }
        None
    }

    /// Return the path of the package `name` as seen from the caller.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        if let Some(manifest) = &self.manifest {
            for table in ["dependencies", "dev-dependencies"] {
                if let Some(Item::Table(deps)) = manifest.get(table)
                    && let Some(path) = Self::find_in_deps(deps, name)
                {
                    return path;
                }
            }
        }
        Self::absolute(name)
    }

    /// Run `func` with the caller's manifest, cached per manifest path and
    /// refreshed when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(manifest_path) = Self::get_manifest_path() else {
            return func(&Manifest {
                manifest: None,
                modified_time: None,
            });
        };
        let modified_time = Self::get_manifest_modified_time(&manifest_path);

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

