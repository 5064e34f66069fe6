use crate::CLAP_STYLING;
use clap::{arg, command};
use leadgather_core::config::DEFAULT_TARGET_URL;
use std::path::PathBuf;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("leadgather")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("leadgather")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("scrape")
                .about(
                    "Fetch a listings page, extract every business-for-sale listing and export \
                them. Saves the raw page when no listings can be found.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help(format!(
                            "The listings page to scrape (default: {}, or the URL of --from-curl)",
                            DEFAULT_TARGET_URL
                        )),
                )
                .arg(
                    arg!(--"base-origin" <ORIGIN>)
                        .required(false)
                        .help("Origin prepended to relative listing links (default: the page's origin)"),
                )
                .arg(
                    arg!(-o --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory the export files are written to")
                        .default_value("."),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: json, csv, both")
                        .value_parser(["json", "csv", "both"])
                        .default_value("both"),
                )
                .arg(
                    arg!(-H --"header" <HEADER>)
                        .required(false)
                        .help("Extra request header as 'Name: value'. May be repeated.")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"from-curl" <PATH>)
                        .required(false)
                        .help("File holding a 'Copy as cURL' command to take the URL and headers from")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Fetch timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"user-agent" <UA>)
                        .required(false)
                        .help("User-Agent to send (default: a desktop Chrome agent)"),
                )
                .arg(
                    arg!(--"browser")
                        .required(false)
                        .help("Render the page in headless Chromium before extracting")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"visible")
                        .required(false)
                        .help("Show the browser window while rendering")
                        .action(clap::ArgAction::SetTrue)
                        .requires("browser"),
                )
                .arg(
                    arg!(--"no-summary")
                        .required(false)
                        .help("Do not print the listing summary")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("discover")
                .about(
                    "Walk through finding the JSON API behind a listings page, and inspect a \
                copied cURL command.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The site to open in the browser")
                        .default_value(DEFAULT_TARGET_URL),
                )
                .arg(
                    arg!(--"curl" <PATH>)
                        .required(false)
                        .help("File holding a 'Copy as cURL' command to parse")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}
