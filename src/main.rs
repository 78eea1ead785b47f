use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = geodome::reference().context("failed to build the dome scene")?;
    app.run().context("viewer terminated with an error")?;
    Ok(())
}
