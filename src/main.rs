mod cli;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    tracing_subscriber::fmt()
        .with_max_level(command_line_interface.verbosity())
        .with_writer(std::io::stderr)
        .init();
    command_line_interface.run()
}
