use diorama::{
    app::DioramaApp,
    config::RendererConfig,
    logging::{init_logging, LoggingConfig},
};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RendererConfig::from_env();
    log::info!("starting with {:?}", config);

    DioramaApp::new(config)?.run()
}
