//! Lists the chainable `DbSession` methods, one signature per line.

use anyhow::Context;
use wrapper_gen::{Paths, SESSION_TYPE, scan};

fn main() -> anyhow::Result<()> {
    wrapper_gen::init_tracing();

    let paths = Paths::workspace();
    let file = scan::parse_file(&paths.session_source).context("cannot scan session source")?;

    for method in scan::chainable_methods(&file, SESSION_TYPE) {
        println!("{}", method.signature(SESSION_TYPE));
    }

    Ok(())
}
