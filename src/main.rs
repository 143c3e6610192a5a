use std::process;

use argtree::{App, Error, Node, Values};
use clap::{value_parser, Arg, ArgAction};
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let app = match build_app() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            process::exit(1);
        }
    };

    let (handler, values) = match app.parse(std::env::args_os().skip(1)) {
        Ok(parsed) => parsed,
        Err(Error::Parse(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            process::exit(1);
        }
    };

    setup_logging(values.get_one::<u8>("debug").copied().unwrap_or(0));
    println!("{}", handler.call(&values, &[]));
}

/// Calculator with `math sum`, `math hex` and `echo`.
fn build_app() -> argtree::Result<App<String>> {
    let mut app = App::new("argtree-demo");
    app.configure(|p| p.about("Example application built on argtree").version(env!("CARGO_PKG_VERSION")));

    app.arg(
        Arg::new("debug")
            .short('d')
            .long("debug")
            .action(ArgAction::Count)
            .global(true)
            .help("Enable debug output (-d, -dd, -ddd)"),
    )
    .arg(
        Arg::new("reverse")
            .short('r')
            .long("reverse")
            .env("ARGTREE_DEMO_REVERSE")
            .action(ArgAction::SetTrue)
            .help("Reverse the output"),
    );

    app.group("math", |math| {
        math.configure(|p| p.about("Arithmetic"));
        math.command("sum", |sum| {
            sum.arg(
                Arg::new("numbers")
                    .help("numbers to compute sum of")
                    .num_args(1..)
                    .required(true)
                    .value_parser(value_parser!(i64)),
            )
            .handler(show(do_sum))?;
            Ok(())
        })?;
        math.command("hex", |hex| {
            hex.configure(|p| p.about("convert number to hex"))
                .arg(Arg::new("number").required(true).value_parser(value_parser!(i64)))
                .handler(show(do_hex))?;
            Ok(())
        })?;
        Ok(())
    })?;

    app.command("echo", |echo| {
        echo.arg(
            Arg::new("uppercase")
                .short('u')
                .action(ArgAction::SetTrue)
                .help("convert to uppercase"),
        )
        .arg(Arg::new("string").required(true))
        .handler(show(do_echo))?;
        Ok(())
    })?;

    Ok(app)
}

/// Wraps a handler so its output honours `--reverse`.
fn show<F>(func: F) -> impl Fn(&Values) -> String
where
    F: Fn(&Values) -> String,
{
    move |values: &Values| {
        let output = func(values);
        if values.get_flag("reverse") {
            output.chars().rev().collect()
        } else {
            output
        }
    }
}

fn do_sum(values: &Values) -> String {
    values
        .get_many::<i64>("numbers")
        .map(|numbers| numbers.sum::<i64>())
        .unwrap_or_default()
        .to_string()
}

fn do_hex(values: &Values) -> String {
    values
        .get_one::<i64>("number")
        .map(|n| format!("{:#x}", n))
        .unwrap_or_default()
}

fn do_echo(values: &Values) -> String {
    let string = values.get_one::<String>("string").cloned().unwrap_or_default();
    if values.get_flag("uppercase") {
        string.to_uppercase()
    } else {
        string
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
