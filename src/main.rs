use warden::{Config, build_runtime, run};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    let runtime = build_runtime(&config)?;
    runtime.block_on(run(config))
}
