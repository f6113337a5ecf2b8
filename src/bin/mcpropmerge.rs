// Merge JSON property files. Used to apply global settings to local server
// instances for banned-ips.json, banned-players.json, ops.json and
// whitelist.json.

use std::process::ExitCode;

use mcadmin_lib::core::props::run_propmerge;

fn main() -> ExitCode {
    mcadmin_lib::init_tracing(false);

    let exit = run_propmerge(std::env::args_os(), &mut std::io::stdout().lock());
    ExitCode::from(exit.code())
}
