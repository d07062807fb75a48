use anyhow::Context;
use fatura_ocr::StatementOcr;
use fatura_storage::XlsxTemplate;
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod session;

use config::AppConfig;
use prompt::Prompter;

fn main() -> anyhow::Result<()> {
    // Logs on stderr keep the prompts on stdout readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (config, _) = AppConfig::load().context("loading configuration")?;

    let fallback_dirs: Vec<_> = config::exe_dir().into_iter().collect();
    let template_path = config.locate_template(&fallback_dirs);
    let mut store = XlsxTemplate::new(&template_path, config.sheet_name.clone());
    if let Some(dir) = &config.output_dir {
        store = store.with_output_dir(dir);
    }

    let ocr = StatementOcr::new(fatura_ocr::default_backend(config.ocr.data_path.clone()))
        .with_languages(config.ocr.languages.clone());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    prompter.greet(store.template_path())?;

    // Surface a missing template up front; each run re-checks it anyway.
    if let Err(e) = fatura_storage::TemplateStore::columns(&store) {
        tracing::warn!("{e}");
        prompter.report_error(&e)?;
    }

    let today = chrono::Local::now().date_naive();
    session::run_interactive(&mut prompter, &store, &ocr, today)?;
    Ok(())
}
