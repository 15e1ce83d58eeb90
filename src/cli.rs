use std::path::PathBuf;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;

use seqpack::io::OnError;
use seqpack::seq::SymbolPolicy;
use seqpack::unit::LINE_WIDTH;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 seqpack version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   pack FASTA records into 2-bit .seq units, and back again";

const USAGE_EXAMPLES: &str = indoc::indoc! {"
    Examples:
      seqpack genome.fa                     # one <id>.seq per record
      seqpack genome.fa --out-dir units/    # same, written into units/
      seqpack chr1.seq chr1.fa              # decode one unit back to FASTA
"};

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    after_help = USAGE_EXAMPLES,
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// with one path: the FASTA file to encode.
    /// with two paths: the .seq unit to decode
    pub input: PathBuf,

    /// the FASTA file to write the decoded unit to
    pub output: Option<PathBuf>,

    /// directory receiving one `<identifier>.seq` unit per record
    #[arg(long, default_value = ".", conflicts_with = "output")]
    pub out_dir: PathBuf,

    /// how characters other than A, C, G, T and U are handled while encoding
    #[arg(long, value_enum, default_value_t = SymbolPolicy::Drop)]
    pub symbols: SymbolPolicy,

    /// whether a record which cannot be encoded stops the whole run
    #[arg(long, value_enum, default_value_t = OnError::Abort)]
    pub on_error: OnError,

    /// bases per line when decoding (0 writes the sequence on a single line)
    #[arg(long, default_value_t = LINE_WIDTH)]
    pub line_width: usize,

    /// refuse to decode units written with a different format version
    #[arg(long, action)]
    pub strict_version: bool,

    /// write a JSON summary of the encoded records to this path
    #[arg(long, conflicts_with = "output")]
    pub report: Option<PathBuf>,

    /// only log warnings and errors
    #[arg(short, long, action)]
    pub quiet: bool,
}
