use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bytes::{BufMut, BytesMut};
use clap::Parser;
use log::debug;
use nfa_grep::Nfa;

/// Print lines that match a pattern.
#[derive(Parser, Debug)]
#[command(name = "nfa-grep", version)]
struct Args {
    /// Pattern to match
    #[arg(short = 'E', value_name = "PATTERN")]
    pattern: String,

    /// Print only the matched parts of selected lines
    #[arg(short = 'o', long)]
    only_matching: bool,

    /// Select only lines matched in full
    #[arg(short = 'x', long)]
    line_regexp: bool,

    /// Print the number of selected lines instead of the lines
    #[arg(short = 'c', long)]
    count: bool,

    /// Files to read; standard input when none are given
    files: Vec<PathBuf>,
}

// Usage: echo <input_text> | nfa-grep -E <pattern>
fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("nfa-grep: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether any line was selected.
fn run(args: &Args) -> Result<bool> {
    let nfa = nfa_grep::compile(&args.pattern)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut selected = 0;

    if args.files.is_empty() {
        let buf = read_all(io::stdin().lock()).context("failed to read standard input")?;
        selected += grep(args, &nfa, buf, &mut out)?;
    } else {
        for path in &args.files {
            let buf = File::open(path)
                .and_then(read_all)
                .with_context(|| format!("failed to read {}", path.display()))?;
            selected += grep(args, &nfa, buf, &mut out)?;
        }
    }

    if args.count {
        writeln!(out, "{selected}")?;
    }
    out.flush()?;
    Ok(selected > 0)
}

/// Drain `reader` straight into a growable buffer.
fn read_all(mut reader: impl Read) -> io::Result<BytesMut> {
    let mut writer = BytesMut::new().writer();
    io::copy(&mut reader, &mut writer)?;
    Ok(writer.into_inner())
}

/// Scan one input buffer line by line and return how many lines were selected.
fn grep(args: &Args, nfa: &Nfa, mut buf: BytesMut, out: &mut impl Write) -> Result<usize> {
    let mut selected = 0;
    let mut line_no = 0;

    while let Some(line) = next_line(&mut buf) {
        line_no += 1;
        let line = std::str::from_utf8(&line)
            .with_context(|| format!("line {line_no} is not valid UTF-8"))?;

        let hit = if args.line_regexp {
            nfa.full_match(line).map(|m| vec![m])
        } else if args.only_matching {
            let found: Vec<_> = nfa.find_all(line).collect();
            (!found.is_empty()).then_some(found)
        } else {
            nfa.search(line).map(|m| vec![m])
        };
        let Some(matches) = hit else {
            continue;
        };
        debug!("line {line_no}: {} match(es)", matches.len());
        selected += 1;

        if args.count {
            continue;
        }
        if args.only_matching {
            for m in matches.iter().filter(|m| !m.is_empty()) {
                writeln!(out, "{}", m.as_str())?;
            }
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(selected)
}

/// Split the next line off `buf`, without its `\n` or `\r\n` terminator.
fn next_line(buf: &mut BytesMut) -> Option<BytesMut> {
    if buf.is_empty() {
        return None;
    }
    let mut line = match buf.iter().position(|&b| b == b'\n') {
        Some(end) => {
            let mut line = buf.split_to(end + 1);
            line.truncate(end);
            line
        }
        None => buf.split(),
    };
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
    Some(line)
}
