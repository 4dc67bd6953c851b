use std::io;

fn main() {
    gobundle_core::tracing::init_tracing();
    let code = gobundle_cli::run(std::env::args_os(), &mut io::stdout().lock(), &mut io::stderr());
    std::process::exit(code);
}
