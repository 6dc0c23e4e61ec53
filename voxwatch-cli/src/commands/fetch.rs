//! Fetch command - download a result document by URL.

use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use voxwatch::results::{ResultFetcher, ResultPresenter};

use crate::error::CliError;
use crate::render::ConsolePresenter;
use crate::runner::{CliRunner, PollingOverrides};

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub url: String,
    pub output: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(false)?;
    runner.log_startup("fetch");

    let polling = runner.polling_config(&PollingOverrides::default());
    let client = runner.http_client(&polling)?;
    let fetcher = ResultFetcher::new(Arc::new(client));

    println!("Downloading result...");
    let result = runner.block_on(fetcher.download_result_file(&args.url))?;

    ConsolePresenter.show_final_results(&result)?;

    if let Some(path) = &args.output {
        runner.save_result(path, &result)?;
        println!();
        println!("Result saved to {}", style(path.display()).cyan());
    }

    Ok(())
}
