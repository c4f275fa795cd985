use clap::{Args, Parser, Subcommand};

use u2a_cli::commands::translit_ops::ConvertFlags;
use u2a_cli::commands::{config_ops, table_ops, translit_ops};

#[derive(Parser)]
#[command(name = "u2atool", about = "Unicode-to-ASCII transliteration tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConvertArgs {
    /// Transliteration table (text dataset or compiled .u2at); embedded default if omitted
    #[arg(long)]
    table: Option<String>,
    /// Settings TOML file
    #[arg(long)]
    settings: Option<String>,
    /// Drop codepoints with no transliteration instead of writing a placeholder
    #[arg(long)]
    drop_unknown: bool,
    /// Placeholder for codepoints with no transliteration (ASCII)
    #[arg(long)]
    placeholder: Option<String>,
    /// Keep the separator space after a final multi-letter replacement
    #[arg(long)]
    keep_trailing: bool,
}

impl From<ConvertArgs> for ConvertFlags {
    fn from(a: ConvertArgs) -> Self {
        ConvertFlags {
            table: a.table,
            settings: a.settings,
            drop_unknown: a.drop_unknown,
            placeholder: a.placeholder,
            keep_trailing: a.keep_trailing,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Transliterate files (or stdin) line by line to stdout
    Translit {
        /// Input files; reads stdin when none are given
        files: Vec<String>,
        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Show how each character of the input resolves
    Lookup {
        /// Text to inspect
        text: String,
        /// Transliteration table (text dataset or compiled .u2at)
        #[arg(long)]
        table: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compile a text dataset into a binary table
    Compile {
        /// Input dataset
        input: String,
        /// Output file
        output: String,
    },
    /// Show table statistics (auto-detected by magic bytes)
    Info {
        /// Table file; embedded default if omitted
        file: Option<String>,
    },
    /// Export the embedded dataset
    TableExport,
    /// Validate a text dataset
    TableValidate {
        /// Path to the dataset
        file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    u2a_cli::trace_init::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Translit { files, args } => translit_ops::translit_cmd(&files, &args.into()),
        Command::Lookup { text, table, json } => {
            translit_ops::lookup_cmd(&text, table.as_deref(), json)
        }
        Command::Compile { input, output } => table_ops::compile(&input, &output),
        Command::Info { file } => table_ops::info(file.as_deref()),
        Command::TableExport => table_ops::table_export(),
        Command::TableValidate { file } => table_ops::table_validate(&file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
