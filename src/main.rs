use fieldroad::app::{
    App,
    config::{Config, ConfigError, USAGE},
    logging::init_file_logging,
};

fn main() -> std::io::Result<()> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let _log_guard = init_file_logging(config.log_level);
    tracing::info!("Starting with {:?}", config);

    let app = App::new(config);
    if app.config().headless {
        return app.run_headless(&mut std::io::stdout().lock());
    }

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}
