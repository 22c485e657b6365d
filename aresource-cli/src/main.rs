mod debug;
mod edit;
mod escape;
mod logging;
mod merge;
mod view;

use aresource::{AndroidResourceFile, traits::Parser as _};
use clap::{Parser, Subcommand};

use crate::{
    debug::run_debug_command, edit::run_set_command, escape::run_decode_command,
    escape::run_encode_command, merge::run_merge_base_command, view::print_view,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log what the library is doing to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn escaped storage text into its logical value.
    Decode {
        /// The escaped text, as it appears inside <string>
        text: String,
        /// Resource name used in error messages
        #[arg(short, long, default_value = "")]
        name: String,
        /// Print the value and the format flag as JSON
        #[arg(long)]
        json: bool,
    },

    /// Escape a logical value for storage in strings.xml.
    Encode {
        /// The logical value
        text: String,
    },

    /// View the units of a strings.xml file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: String,

        /// Override the language inferred from the path
        #[arg(short, long)]
        lang: Option<String>,

        /// Display full value without truncation
        #[arg(long)]
        full: bool,
    },

    /// Set the value of an existing unit.
    Set {
        /// The file to edit
        #[arg(short, long)]
        input: String,
        /// Name of the unit
        #[arg(short, long)]
        key: String,
        /// New logical value
        #[arg(short, long)]
        value: String,
        /// Write here instead of editing in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Merge a base-language strings.xml into a translation.
    MergeBase {
        /// The translation file
        #[arg(short, long)]
        input: String,
        /// The base-language file
        #[arg(short, long)]
        base: String,
        /// Write here instead of editing in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Dump a strings.xml file as JSON.
    Debug {
        /// The input file
        #[arg(short, long)]
        input: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let result = match args.commands {
        Commands::Decode { text, name, json } => run_decode_command(text, name, json),
        Commands::Encode { text } => {
            run_encode_command(text);
            Ok(())
        }
        Commands::View { input, lang, full } => {
            match AndroidResourceFile::read_from(&input) {
                Ok(mut file) => {
                    if lang.is_some() {
                        file.language = lang;
                    }
                    match print_view(&file, full) {
                        0 => Ok(()),
                        n => Err(format!("{} unit(s) could not be decoded", n)),
                    }
                }
                Err(e) => Err(format!("Error reading {}: {}", input, e)),
            }
        }
        Commands::Set {
            input,
            key,
            value,
            output,
        } => run_set_command(input, key, value, output),
        Commands::MergeBase {
            input,
            base,
            output,
        } => run_merge_base_command(input, base, output),
        Commands::Debug { input, output } => run_debug_command(input, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
