mod err;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgMatches, Command};
use nullguard_core::eval::EvalError;
use nullguard_core::{
    GuardErrorExt, Interpreter, LoweredModule, LoweringOptions, ModuleSource, Value,
    generate_error_report, lower_source_file,
};

use crate::err::{CliError, boxed};
use crate::output::{Format, FormatStyle, render_lowered, render_outcome, summary_footer, summary_table};

type CommandResult = Result<ExitCode, Box<dyn GuardErrorExt>>;

fn main() -> ExitCode {
    let cli = Command::new("nullguard")
        .version("0.1.0")
        .about("Lowers null-checked parameters into argument guards");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    match dispatch_commands(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", FormatStyle::default().error.apply_to(generate_error_report(e.as_ref())));
            ExitCode::from(2)
        }
    }
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("lower")
                .about("Lower a module and print the result")
                .arg(
                    Arg::new("file")
                        .help("The module source (JSON) to lower")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .help("Output format")
                        .short('f')
                        .long("format")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .value_name("FORMAT"),
                )
                .arg(workers_arg())
                .arg(
                    Arg::new("output")
                        .help("Write the result to this file instead of stdout")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_name("FILE"),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Tabulate the guards inserted into every matching module")
                .arg(
                    Arg::new("pattern")
                        .help("Glob pattern selecting module sources")
                        .required(true)
                        .index(1),
                )
                .arg(workers_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Lower a module and evaluate one of its functions")
                .arg(
                    Arg::new("file")
                        .help("The module source (JSON)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("function")
                        .help("Name of the function to call")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("args")
                        .help("Arguments as a JSON array, e.g. '[null, 3]'")
                        .index(3)
                        .default_value("[]"),
                ),
        )
}

fn workers_arg() -> Arg {
    Arg::new("workers")
        .help("Number of lowering threads")
        .short('j')
        .long("workers")
        .value_parser(clap::value_parser!(usize))
        .value_name("N")
}

fn lowering_options(matches: &ArgMatches) -> LoweringOptions {
    let options = LoweringOptions::default();
    match matches.get_one::<usize>("workers") {
        Some(workers) => options.with_workers(*workers),
        None => options,
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String, Box<dyn GuardErrorExt>> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| CliError::boxed(format!("missing argument <{}>", name)))
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> CommandResult {
    match matches.subcommand() {
        Some(("lower", sub_m)) => lower_command(sub_m),
        Some(("summary", sub_m)) => summary_command(sub_m),
        Some(("run", sub_m)) => run_command(sub_m),
        _ => Err(CliError::boxed("no valid subcommand was used, see --help")),
    }
}

fn lower_command(matches: &ArgMatches) -> CommandResult {
    let file = PathBuf::from(required(matches, "file")?);
    let format = Format::parse(required(matches, "format")?)
        .ok_or_else(|| CliError::boxed("unknown output format"))?;

    let lowered = lower_source_file(&file, &lowering_options(matches))?;
    let rendered = render_lowered(&lowered, format)
        .map_err(|e| CliError::boxed(format!("could not serialize `{}`: {}", lowered.module.name(), e)))?;

    match matches.get_one::<PathBuf>("output") {
        Some(out) => fs::write(out, rendered)
            .map_err(|e| CliError::boxed(format!("could not write {:?}: {}", out, e)))?,
        None => print!("{}", rendered),
    }
    Ok(ExitCode::SUCCESS)
}

fn summary_command(matches: &ArgMatches) -> CommandResult {
    let pattern = required(matches, "pattern")?;
    let options = lowering_options(matches);
    let style = FormatStyle::default();

    let paths = ModuleSource::discover(pattern).map_err(boxed)?;
    if paths.is_empty() {
        return Err(CliError::boxed(format!("no module matches `{}`", pattern)));
    }
    let modules = paths
        .iter()
        .map(|path| lower_source_file(path, &options))
        .collect::<Result<Vec<LoweredModule>, _>>()?;

    println!("{}", style.title.apply_to("Null guards"));
    println!("{}", summary_table(&modules));
    println!("{}", summary_footer(&modules, &style));
    Ok(ExitCode::SUCCESS)
}

fn run_command(matches: &ArgMatches) -> CommandResult {
    let file = PathBuf::from(required(matches, "file")?);
    let name = required(matches, "function")?;
    let raw_args = required(matches, "args")?;

    let lowered = lower_source_file(&file, &LoweringOptions::default())?;
    let function = lowered
        .function(name)
        .ok_or_else(|| boxed(EvalError::unknown_function(name)))?;

    let json: serde_json::Value = serde_json::from_str(raw_args)
        .map_err(|e| CliError::boxed(format!("arguments are not valid JSON: {}", e)))?;
    let serde_json::Value::Array(items) = json else {
        return Err(CliError::boxed("arguments must be a JSON array"));
    };
    if items.len() != function.parameters.len() {
        return Err(boxed(EvalError::arity(name, function.parameters.len(), items.len())));
    }
    let args = items
        .iter()
        .zip(&function.parameters)
        .map(|(item, param)| Value::from_json(item, &param.ty))
        .collect::<Result<Vec<_>, _>>()
        .map_err(boxed)?;

    let outcome = Interpreter::new(&lowered)
        .invoke(name, args)
        .map_err(boxed)?;
    println!("{}", render_outcome(name, &outcome, &FormatStyle::default()));

    if outcome.is_throw() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
