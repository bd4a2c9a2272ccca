//! `gah tree` command

use anyhow::Result;

use crate::cli::TreeArgs;
use gah::ops::{render_tree, TreeOptions};
use gah::resolver::resolve_host;
use gah::GlobalContext;

pub fn execute(args: TreeArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = ctx.workspace()?;
    let resolve = resolve_host(ws.descriptor())?;

    let opts = TreeOptions {
        depth: args.depth,
        duplicates: args.duplicates,
    };
    print!("{}", render_tree(&resolve, &opts));

    Ok(())
}
