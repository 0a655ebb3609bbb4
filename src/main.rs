use outline_scene::{Showcase, ShowcaseSettings};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "outline_scene=info".into()),
        )
        .init();

    Showcase::new(ShowcaseSettings::default())?.run()
}
