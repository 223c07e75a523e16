fn main() -> anyhow::Result<()> {
    subguard_cli::run_main()
}
