fn main() -> anyhow::Result<()> {
    plink2arff::cli::run()
}
