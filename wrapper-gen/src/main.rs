//! Regenerates `wrapper/src/session/generated.rs` from the current
//! `DbSession` method set.

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    wrapper_gen::init_tracing();

    let paths = wrapper_gen::Paths::workspace();
    wrapper_gen::generate(&paths).context("wrapper generation failed")?;

    Ok(())
}
