//! Binary entry point for the echo Lambda.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    eventgate_lambda_echo::run().await
}
