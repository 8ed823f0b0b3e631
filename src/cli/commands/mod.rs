pub mod auth_service;
pub mod client;
pub mod gates;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";

fn server_command() -> Command {
    let command = Command::new("server").about("Serve the gated pages").arg(
        Arg::new(ARG_PORT)
            .short('p')
            .long(ARG_PORT)
            .help("Port to listen on")
            .default_value("8080")
            .env("PORTICO_PORT")
            .value_parser(clap::value_parser!(u16)),
    );
    gates::with_args(command)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("portico")
        .about("Session gate for web application pages")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(server_command())
        .subcommand(client::sign_in_command())
        .subcommand(client::sign_out_command());

    let command = auth_service::with_args(command);
    logging::with_args(command)
}
