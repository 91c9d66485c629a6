fn main() -> anyhow::Result<()> {
    kai_lib::run()
}
