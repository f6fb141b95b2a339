use crate::{
    cli::{actions::show, globals::GlobalArgs},
    features::logs::LogQuery,
};
use anyhow::Result;
use chrono::FixedOffset;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub query: LogQuery,
    pub offset: FixedOffset,
}

/// # Errors
/// Returns an error if not signed in or the log cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let app = args.globals.app()?;
    show(app.open_logs(args.query, args.offset).await)
}
