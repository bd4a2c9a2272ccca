//! `gah clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use gah::ops::clean;
use gah::GlobalContext;

pub fn execute(_args: CleanArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = ctx.workspace()?;
    clean(&ws)?;
    Ok(())
}
