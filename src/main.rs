// SPDX-License-Identifier: MPL-2.0
use kaitori_admin::app::{self, paths, Flags};
use kaitori_admin::logging;

const HELP: &str = "\
kaitori_admin - buy-price list admin console

USAGE:
    kaitori_admin [OPTIONS]

OPTIONS:
    --lang <LOCALE>       UI language (e.g. ja, en-US)
    --config-dir <DIR>    Directory holding settings.toml
    --data-dir <DIR>      Directory for the catalog, accounts and photos
    -h, --help            Print this help

ENVIRONMENT:
    KAITORI_CONFIG_DIR    Same as --config-dir
    KAITORI_DATA_DIR      Same as --data-dir
    KAITORI_LOG           Log filter (default: info)
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    logging::init();

    let flags = Flags {
        lang: optional_arg(&mut args, "--lang"),
        config_dir: optional_arg(&mut args, "--config-dir"),
        data_dir: optional_arg(&mut args, "--data-dir"),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unknown arguments");
    }

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting kaitori_admin");
    app::run(flags)
}

fn optional_arg(args: &mut pico_args::Arguments, name: &'static str) -> Option<String> {
    match args.opt_value_from_str(name) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(option = name, error = %err, "invalid option value");
            None
        }
    }
}
