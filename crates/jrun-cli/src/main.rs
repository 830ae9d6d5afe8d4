use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jrun_cli::{LaunchPlan, Launcher};
use jrun_memory::ContainerLimits;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "jrun",
    version,
    about = "Container-aware JVM launcher (heap, GC and CPU flags from cgroup limits)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive JVM options and exec the application
    Run(RunArgs),
    /// Print the derived JVM option string
    Options(JsonArgs),
    /// Print the detected container limits
    Limits(JsonArgs),
    /// Print the java command line without running it
    Command(CommandArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Arguments passed through to the application
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Args)]
struct JsonArgs {
    /// Emit JSON suitable for scripts
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CommandArgs {
    /// Emit JSON suitable for scripts
    #[arg(long)]
    json: bool,
    /// Arguments passed through to the application
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Serialize)]
struct CommandReport<'a> {
    argv: Vec<String>,
    #[serde(flatten)]
    plan: &'a LaunchPlan,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let launcher = Launcher::from_env()?;
    launcher.init_tracing();

    match cli.command {
        Command::Run(args) => {
            let plan = launcher.plan(args.args)?;
            plan.exec()
        }
        Command::Options(args) => {
            let report = launcher.options()?;
            if args.json {
                print_json(&report)?;
            } else {
                println!("{}", report.options);
            }
            Ok(0)
        }
        Command::Limits(args) => {
            let limits = launcher.limits();
            if args.json {
                print_json(&limits)?;
            } else {
                print_limits(&limits);
            }
            Ok(0)
        }
        Command::Command(args) => {
            let plan = launcher.plan(args.args)?;
            if args.json {
                let report = CommandReport {
                    argv: plan
                        .argv()
                        .iter()
                        .map(|arg| arg.to_string_lossy().into_owned())
                        .collect(),
                    plan: &plan,
                };
                print_json(&report)?;
            } else {
                println!("{}", plan.display_command());
            }
            Ok(0)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_limits(limits: &ContainerLimits) {
    println!("memory: {}", describe_bytes(limits.memory_bytes, "unlimited"));
    println!(
        "host memory: {}",
        describe_bytes(limits.host_memory_bytes, "unknown")
    );
    match limits.cpu_cores {
        Some(cores) => println!("cpu cores: {cores}"),
        None => println!("cpu cores: unlimited"),
    }
}

fn describe_bytes(bytes: Option<u64>, absent: &str) -> String {
    match bytes {
        Some(bytes) => format!("{} MiB ({bytes} bytes)", bytes / jrun_memory::MB),
        None => absent.to_string(),
    }
}
