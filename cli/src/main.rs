fn main() -> anyhow::Result<()> {
    pos_vertical_cli::run_cli()
}
