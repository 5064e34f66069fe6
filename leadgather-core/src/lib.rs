pub mod config;
pub mod curl;
pub mod error;
pub mod export;
pub mod scrape;
pub mod summary;

use colored::Colorize;

pub use config::{ScrapeConfig, SourceKind};
pub use error::{ConfigError, ExportError, ScrapeError};
pub use export::ExportFormat;
pub use scrape::{ScrapeOutcome, build_page_source, execute_scrape};

pub fn print_banner() {
    let banner = r#"
  _                _              _   _
 | | ___  __ _  __| | __ _  __ _| |_| |__   ___ _ __
 | |/ _ \/ _` |/ _` |/ _` |/ _` | __| '_ \ / _ \ '__|
 | |  __/ (_| | (_| | (_| | (_| | |_| | | |  __/ |
 |_|\___|\__,_|\__,_|\__, |\__,_|\__|_| |_|\___|_|
                     |___/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} v{}\n",
        "business-for-sale listing extractor".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
}
