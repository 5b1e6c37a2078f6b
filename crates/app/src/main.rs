fn init_logging(settings: &config::Settings) {
    let level = settings.logging.level_filter();
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = Vec::new();
    loggers.push(simplelog::TermLogger::new(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ));

    match open_log_file(settings) {
        Ok(file) => loggers.push(simplelog::WriteLogger::new(
            level,
            simplelog::Config::default(),
            file,
        )),
        Err(err) => eprintln!("linepad: file logging disabled: {err}"),
    }

    if let Err(err) = simplelog::CombinedLogger::init(loggers) {
        eprintln!("linepad: logger setup failed: {err}");
    }
}

fn open_log_file(settings: &config::Settings) -> Result<std::fs::File, Box<dyn std::error::Error>> {
    let path = settings.logging.log_file()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::File::create(path)?)
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_err) = match config::Settings::load() {
        Ok(settings) => (settings, None),
        Err(err) => (config::Settings::default(), Some(err)),
    };

    init_logging(&settings);

    if let Some(err) = config_err {
        log::warn!("using default settings: {err}");
    }

    let app = fltk::app::App::default().with_scheme(fltk::app::Scheme::Gtk);

    let doc = match editor_state::document::Document::open(&settings.general.default_file) {
        Ok(doc) => doc,
        Err(err) => {
            log::error!(
                "cannot open {}: {err}",
                settings.general.default_file.display()
            );
            fltk::dialog::message_default(&err.user_message());
            return Err(err.into());
        }
    };

    let mut main_window = ui::MainWindow::new(&settings, doc);
    main_window.show();

    app.run()?;

    Ok(())
}
