//! `pathtypes` binary entry point.

fn main() {
    pathtypes_cli::init_tracing();
    std::process::exit(pathtypes_cli::run_cli(std::env::args().collect()));
}
