use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    mcadmin_lib::run().await
}
