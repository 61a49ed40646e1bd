use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_qrgen::encoder::tables::ec_block_info;
use rust_qrgen::render::{RenderOptions, TextRenderer};
use rust_qrgen::{ECLevel, EncodeOptions, Mode, Version, make};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR Code and Micro QR Code encoder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode content and print the symbol
    Encode(EncodeArgs),
    /// Print the data capacity of a version per error correction level
    Capacity {
        /// Version, 1 .. 40 or M1 .. M4
        version: Version,
    },
}

#[derive(Args)]
struct EncodeArgs {
    /// Content to encode
    content: String,
    /// Error correction level (L, M, Q, H)
    #[arg(long, short)]
    error: Option<ECLevel>,
    /// Version, 1 .. 40 or M1 .. M4
    #[arg(long, short)]
    version: Option<Version>,
    /// Write a single segment in this mode
    #[arg(long, short)]
    mode: Option<Mode>,
    /// Mask index
    #[arg(long)]
    mask: Option<u8>,
    /// Byte mode character encoding
    #[arg(long)]
    encoding: Option<String>,
    /// Write an ECI header for non-Latin-1 byte segments
    #[arg(long)]
    eci: bool,
    /// Only use Micro QR Codes
    #[arg(long, conflicts_with = "no_micro")]
    micro: bool,
    /// Never use Micro QR Codes
    #[arg(long)]
    no_micro: bool,
    /// Raise the error level while the data fits the chosen version
    #[arg(long)]
    boost_error: bool,
    /// Quiet zone in modules
    #[arg(long)]
    border: Option<usize>,
    /// Print 1 and 0 instead of block characters
    #[arg(long)]
    digits: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("QR_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode(args) => encode_cmd(args),
        Command::Capacity { version } => capacity_cmd(version),
    }
}

fn encode_cmd(args: EncodeArgs) -> ExitCode {
    let mut options = EncodeOptions::new()
        .eci(args.eci)
        .boost_error(args.boost_error);
    options.error = args.error;
    options.version = args.version;
    options.mode = args.mode;
    options.mask = args.mask;
    options.encoding = args.encoding;
    if args.micro {
        options = options.micro(true);
    } else if args.no_micro {
        options = options.micro(false);
    }

    let qr = match make(args.content.as_str(), &options) {
        Ok(qr) => qr,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Symbol: {} ({}x{} modules), mask {}",
        qr.designator(),
        qr.size(),
        qr.size(),
        qr.mask
    );
    for (i, segment) in qr.segments.iter().enumerate() {
        println!(
            "  Segment {}: mode={}, chars={}, encoding={}, eci={}",
            i,
            segment.mode(),
            segment.char_count(),
            segment.encoding().unwrap_or("-"),
            segment
                .eci()
                .map_or_else(|| "-".to_string(), |d| d.to_string())
        );
    }

    let renderer = if args.digits {
        TextRenderer::digits()
    } else {
        TextRenderer::default()
    };
    let render_options = RenderOptions {
        scale: 1,
        border: args.border,
    };
    print!("{}", renderer.to_text(&qr, &render_options));
    ExitCode::SUCCESS
}

fn capacity_cmd(version: Version) -> ExitCode {
    println!("Version {} ({}x{} modules)", version, version.size(), version.size());
    let levels: Vec<Option<ECLevel>> = if version.error_levels().is_empty() {
        vec![None]
    } else {
        version.error_levels().iter().copied().map(Some).collect()
    };
    for level in levels {
        let Some(info) = ec_block_info(version, level) else {
            continue;
        };
        println!(
            "  {}: {} data bits, {} data codewords, {} ecc codewords in {} block(s)",
            level.map_or("-", |l| l.name()),
            info.data_bits,
            info.data_codewords,
            info.ecc_codewords(),
            info.num_blocks
        );
    }
    ExitCode::SUCCESS
}
