fn main() -> anyhow::Result<()> {
    eventline_cli::run()
}
