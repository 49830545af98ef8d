use cinefind::run;

fn main() -> anyhow::Result<()> {
    // all session work is cooperative on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run())
}
