// MessagePack rewriter: decodes every value on stdin and re-encodes it
// with the smallest-width encoder on stdout. Exit code 0 only on a clean
// end-of-stream.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use msgpackr::encode::writer;
use msgpackr::{Header, Kind, PackError, Prefix, StreamUnpacker};

#[derive(Parser, Debug)]
#[command(
    name = "msgpackr",
    version,
    about = "Rewrite a MessagePack stream using minimal-width encodings",
    long_about = "Reads MessagePack values from standard input, re-encodes each one with \
the smallest-width encoder and writes the result to standard output. \
Exits 0 only when the input ends cleanly on a value boundary."
)]
struct Cli {
    /// Refill buffer size in bytes (minimum 8).
    #[arg(long, default_value_t = 4096)]
    buffer_size: usize,

    /// Container nesting limit; guards stack use on untrusted input.
    #[arg(long, default_value_t = 128)]
    max_depth: usize,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    /// RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.buffer_size < StreamUnpacker::MIN_BUFFER {
        eprintln!(
            "msgpackr: --buffer-size must be at least {}",
            StreamUnpacker::MIN_BUFFER
        );
        return ExitCode::FAILURE;
    }

    let mut refill = vec![0u8; cli.buffer_size];
    let mut src = io::stdin().lock();
    let mut out = io::BufWriter::new(io::stdout().lock());
    let mut unpacker = StreamUnpacker::new(&mut refill);

    match rewrite_stream(&mut unpacker, &mut src, &mut out, cli.max_depth) {
        Ok(values) => {
            if let Err(e) = out.flush() {
                tracing::error!(error = %e, "flush failed");
                return ExitCode::FAILURE;
            }
            tracing::debug!(
                values,
                bytes_read = unpacker.bytes_read(),
                "stream rewritten"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                bytes_read = unpacker.bytes_read(),
                "rewrite failed"
            );
            eprintln!("msgpackr: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Rewrites every value until the input ends; returns the value count.
///
/// A clean end of stream is one raised at a value boundary with an empty
/// window; anything else is an error.
fn rewrite_stream<R: Read, W: Write>(
    unpacker: &mut StreamUnpacker<'_>,
    src: &mut R,
    out: &mut W,
    max_depth: usize,
) -> Result<u64, PackError> {
    let mut values = 0u64;
    loop {
        match unpacker.next(src) {
            Ok(header) => {
                rewrite_value(unpacker, src, out, &header, 0, max_depth)?;
                values += 1;
            }
            Err(PackError::EndOfStream) if unpacker.window_len() == 0 => return Ok(values),
            Err(e) => return Err(e),
        }
    }
}

fn rewrite_value<R: Read, W: Write>(
    unpacker: &mut StreamUnpacker<'_>,
    src: &mut R,
    out: &mut W,
    header: &Header,
    depth: usize,
    max_depth: usize,
) -> Result<(), PackError> {
    match header.kind {
        Kind::Nil => writer::write_nil(out),
        Kind::False => writer::write_bool(out, false),
        Kind::True => writer::write_bool(out, true),

        Kind::PosFixInt(_) | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 => {
            let v = unpacker.as_int::<u64, _>(src, header)?;
            writer::write_uint(out, v)
        }
        Kind::NegFixInt(_) | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => {
            let v = unpacker.as_int::<i64, _>(src, header)?;
            writer::write_sint(out, v)
        }
        Kind::Float32 => {
            let v = unpacker.as_float::<f32, _>(src, header)?;
            writer::write_float(out, f64::from(v))
        }
        Kind::Float64 => {
            let v = unpacker.as_float::<f64, _>(src, header)?;
            writer::write_float(out, v)
        }

        Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32 => {
            copy_payload(unpacker, src, out, header, Prefix::str_header(header.size as usize)?)
        }
        Kind::Bin8 | Kind::Bin16 | Kind::Bin32 => {
            copy_payload(unpacker, src, out, header, Prefix::bin_header(header.size as usize)?)
        }
        Kind::FixExt1
        | Kind::FixExt2
        | Kind::FixExt4
        | Kind::FixExt8
        | Kind::FixExt16
        | Kind::Ext8
        | Kind::Ext16
        | Kind::Ext32 => {
            let prefix = Prefix::ext_header(header.size as usize, header.ext_type)?;
            copy_payload(unpacker, src, out, header, prefix)
        }

        Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
            check_depth(depth, max_depth)?;
            writer::write_array_header(out, header.size as usize)?;
            let mut cursor = unpacker.open_array(header)?;
            while let Some(child) = cursor.next(src)? {
                rewrite_value(cursor.unpacker(), src, out, &child, depth + 1, max_depth)?;
            }
            Ok(())
        }
        Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
            check_depth(depth, max_depth)?;
            writer::write_map_header(out, header.size as usize)?;
            let mut cursor = unpacker.open_map(header)?;
            while let Some(child) = cursor.next(src)? {
                rewrite_value(cursor.unpacker(), src, out, &child, depth + 1, max_depth)?;
            }
            Ok(())
        }
    }
}

/// Streams a blob payload through the raw sub-reader under a fresh
/// minimal prefix; never buffers the whole payload.
fn copy_payload<R: Read, W: Write>(
    unpacker: &mut StreamUnpacker<'_>,
    src: &mut R,
    out: &mut W,
    header: &Header,
    prefix: Prefix,
) -> Result<(), PackError> {
    out.write_all(prefix.as_bytes())?;
    let mut raw = unpacker.raw_reader(src, header)?;
    let copied = io::copy(&mut raw, out)?;
    if copied != u64::from(header.size) {
        return Err(PackError::EndOfStream);
    }
    Ok(())
}

fn check_depth(depth: usize, max_depth: usize) -> Result<(), PackError> {
    if depth >= max_depth {
        return Err(PackError::InvalidValue("container nesting exceeds --max-depth"));
    }
    Ok(())
}
