//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod assets;
pub mod completions;
pub mod refresh;
pub mod serve;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{AssetsSubcommand, Cli, Commands};
use crate::error::BoxboardError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), BoxboardError> {
    match cli.command {
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Refresh(args) => refresh::run(&args).await,
        Commands::Assets(cmd) => match cmd.subcommand {
            AssetsSubcommand::Check(args) => assets::check(&args),
            AssetsSubcommand::Diff(args) => assets::diff(&args),
            AssetsSubcommand::Emit(args) => assets::emit(&args),
        },
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
