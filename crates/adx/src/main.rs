//! `adx`: typed tracking functions from a tracking plan.

fn main() {
    adx_cli::init_tracing();
    std::process::exit(adx_cli::run_cli(std::env::args().collect()));
}
