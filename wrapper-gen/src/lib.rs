//! Generator for the delegating methods of `session_wrapper::Session`
//!
//! `Session` wraps `DbSession` and must expose every chainable `DbSession`
//! method while still returning `Session`. Rust has no reflection over the
//! method set, so this crate reads `DbSession`'s source with `syn`:
//!
//! - `scan` - selects the chainable methods (`fn(self, ..) -> Self`)
//! - `emit` - renders a forwarding method on `Session` for each of them
//!
//! Methods the hand-written `Session` already defines (e.g. `in_list`) are
//! left out so the override wins. Run `cargo run -p session-wrapper-gen` after
//! changing `DbSession`.

pub mod emit;
pub mod error;
pub mod scan;

use std::path::{Path, PathBuf};

pub use error::GenError;
pub use scan::{Method, Param};

/// The wrapped session type.
pub const SESSION_TYPE: &str = "DbSession";

/// The wrapper type the methods are emitted on.
pub const WRAPPER_TYPE: &str = "Session";

/// Where the generator reads from and writes to.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Source defining the wrapped session type
    pub session_source: PathBuf,
    /// Source of the hand-written wrapper (its methods are not generated)
    pub wrapper_source: PathBuf,
    /// Generated file, overwritten on every run
    pub output: PathBuf,
}

impl Paths {
    /// The fixed locations inside this workspace.
    pub fn workspace() -> Self {
        let src = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("wrapper")
            .join("src");
        Self {
            session_source: src.join("query").join("builder.rs"),
            wrapper_source: src.join("session").join("mod.rs"),
            output: src.join("session").join("generated.rs"),
        }
    }
}

/// The chainable session methods that still need a generated wrapper.
pub fn wrapped_methods(paths: &Paths) -> Result<Vec<Method>, GenError> {
    let session = scan::parse_file(&paths.session_source)?;
    let wrapper = scan::parse_file(&paths.wrapper_source)?;

    let overridden = scan::defined_names(&wrapper, WRAPPER_TYPE);
    let methods = scan::chainable_methods(&session, SESSION_TYPE)
        .into_iter()
        .filter(|method| {
            let keep = !overridden.contains(&method.name);
            if !keep {
                tracing::debug!(method = %method.name, "Overridden by hand-written wrapper");
            }
            keep
        })
        .collect();

    Ok(methods)
}

/// Regenerate the wrapper methods. Returns how many were written.
pub fn generate(paths: &Paths) -> Result<usize, GenError> {
    let methods = wrapped_methods(paths)?;
    let source = emit::render(WRAPPER_TYPE, &methods);

    std::fs::write(&paths.output, source).map_err(|source| GenError::Write {
        path: paths.output.clone(),
        source,
    })?;

    tracing::info!(
        methods = methods.len(),
        output = %paths.output.display(),
        "Generated wrapper methods"
    );
    Ok(methods.len())
}

/// Console logging for the generator binaries. Quiet unless `RUST_LOG` says
/// otherwise.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
