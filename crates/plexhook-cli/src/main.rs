//! Binary entrypoint for the plexhook post-processing hook.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let result = plexhook_cli::run().await;
    process::exit(result.exit_code());
}
