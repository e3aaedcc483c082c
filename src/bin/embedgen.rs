//! embedgen binary

use clap::{Args, Parser, Subcommand};
use embedgen::codegen::cli::{
    extract_resources, generate_resources, show_resources, verify_generated,
};
use embedgen::codegen::defaults::{
    DEFAULT_CONTAINER, DEFAULT_HEADER, DEFAULT_INDENT, DEFAULT_NAMESPACE, DEFAULT_ROW_TYPE,
    DEFAULT_TABLE_NAME,
};
use embedgen::exit_codes::{EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS};
use embedgen::logger::JsonLogger;
use embedgen::{GenerateOptions, Scaffolding};
use std::{env, ffi::OsString, panic, path::PathBuf, process};

const VERSION: &str = embedgen::version::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "embedgen",
    version = VERSION,
    about = "Embed resource files into a generated C++ translation unit"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error, json:<level>)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a translation unit embedding the matched files
    Generate(GenerateArgs),

    /// List the resources of a generated file
    Inspect {
        generated: PathBuf,

        #[command(flatten)]
        table: TableArg,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the resources of a generated file back to disk
    Extract {
        generated: PathBuf,
        dest_dir: PathBuf,

        /// Only extract resources under this prefix, stripping it
        #[arg(long)]
        prefix: Option<String>,

        #[command(flatten)]
        table: TableArg,
    },

    /// Check a generated file against its JSON manifest
    Verify {
        generated: PathBuf,
        manifest_json: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TableArg {
    /// Name of the resource table in the generated file
    #[arg(long = "table", default_value = DEFAULT_TABLE_NAME)]
    name: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Generated C++ file to write
    output: PathBuf,

    /// Directory that patterns and embedded paths are relative to
    base_dir: PathBuf,

    /// Glob patterns or directories, relative to the base directory
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Indent of literal lines
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Header included at the top of the generated file
    #[arg(long, default_value = DEFAULT_HEADER)]
    header: String,

    /// Enclosing namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Container template of the resource table
    #[arg(long, default_value = DEFAULT_CONTAINER)]
    container: String,

    /// Element type of the resource table
    #[arg(long, default_value = DEFAULT_ROW_TYPE)]
    row_type: String,

    #[command(flatten)]
    table: TableArg,

    /// Also write a JSON manifest of the embedded files
    #[arg(long)]
    manifest_json: Option<PathBuf>,

    /// Fail when a pattern matches no files
    #[arg(long)]
    strict: bool,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            indent: self.indent,
            scaffolding: Scaffolding {
                header: self.header.clone(),
                namespace: self.namespace.clone(),
                container: self.container.clone(),
                row_type: self.row_type.clone(),
                table_name: self.table.name.clone(),
            },
            manifest_json: self.manifest_json.clone(),
            strict: self.strict,
        }
    }
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in embedgen");
            process::exit(EXIT_PANIC);
        }
    }
}

/// Parse arguments; on failure print clap's message and return the exit code.
///
/// `--help` and `--version` come back as `EXIT_SUCCESS`, anything else as
/// `EXIT_INVALID_ARGS`.
fn parse_args<I, T>(args: I) -> Result<Cli, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            EXIT_INVALID_ARGS
        } else {
            EXIT_SUCCESS
        }
    })
}

fn run() -> i32 {
    let cli = match parse_args(env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    if let Some(ref level) = cli.log_level {
        JsonLogger::init_with_level(level, "CLI --log-level");
    } else {
        JsonLogger::init();
    }
    log::debug!("🚀 embedgen {}", embedgen::version::full_version());

    match cli.command {
        Command::Generate(args) => {
            let options = args.options();
            generate_resources(&args.output, &args.base_dir, &args.patterns, &options)
        }
        Command::Inspect {
            generated,
            table,
            json,
        } => show_resources(&generated, &table.name, json),
        Command::Extract {
            generated,
            dest_dir,
            prefix,
            table,
        } => extract_resources(&generated, &dest_dir, prefix.as_deref(), &table.name),
        Command::Verify {
            generated,
            manifest_json,
        } => verify_generated(&generated, &manifest_json),
    }
}
