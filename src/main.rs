use a2list::applesoft::detokenize;
use a2list::dis::m65c02::disassemble;
use a2list::error::{PartialListing, TableError};
use a2list::hex::hex_dump;
use a2list::preview::{self, FileKind};
use a2list::table::{TableFile, Tables};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use std::fs;
use std::path::{Path, PathBuf};

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    /// A table file whose .OPCODES and/or .TOKENS blocks replace the
    /// built-in tables.
    #[arg(long, global = true)]
    tables: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Disassembles a file of 65C02 machine code.
    Dis {
        /// The binary file to disassemble.
        file: PathBuf,
        /// The address at which the first byte of the file is loaded.
        #[arg(long, value_parser = maybe_hex::<u32>, default_value_t = 0x2000)]
        addr: u32,
    },
    /// Prints a hex dump of a file.
    Hex {
        /// The file to dump.
        file: PathBuf,
        /// The address shown for the first byte of the file.
        #[arg(long, value_parser = maybe_hex::<u32>, default_value_t = 0)]
        addr: u32,
    },
    /// Lists a tokenized AppleSoft BASIC program.
    Basic {
        /// The program file to list.
        file: PathBuf,
    },
    /// Lists a file the way its ProDOS file type calls for.
    Preview {
        /// The file to list.
        file: PathBuf,
        /// The ProDOS file type.
        #[arg(long = "type", value_parser = maybe_hex::<u8>)]
        file_type: u8,
        /// The ProDOS auxiliary type.
        #[arg(long, value_parser = maybe_hex::<u16>, default_value_t = 0)]
        aux: u16,
    },
}

//===========================================================================//

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let builtin = Tables::builtin()?;
    let table_file = match &cli.tables {
        Some(path) => Some(load_table_file(path)?),
        None => None,
    };
    let tables = match &table_file {
        Some(file) => builtin.overridden_by(file),
        None => builtin,
    };
    match cli.command {
        Command::Dis { file, addr } => {
            let data = read_file(&file)?;
            let disassembly = disassemble(tables.opcodes, &data, addr)
                .map_err(print_partial)?;
            print!("{}", disassembly.listing);
        }
        Command::Hex { file, addr } => {
            let data = read_file(&file)?;
            print!("{}", hex_dump(&data, addr));
        }
        Command::Basic { file } => {
            let data = read_file(&file)?;
            let listing =
                detokenize(tables.tokens, &data).map_err(print_partial)?;
            print!("{listing}");
        }
        Command::Preview { file, file_type, aux } => {
            let Some(kind) = FileKind::from_prodos(file_type, aux) else {
                bail!(
                    "no preview for file type ${file_type:02X} \
                     (aux type ${aux:04X})"
                );
            };
            let data = read_file(&file)?;
            let preview = preview::render(tables, kind, &data);
            print!("{}", preview.listing);
            if let Some(hex) = &preview.hex {
                println!();
                print!("{hex}");
            }
            if let Some(error) = preview.error {
                return Err(anyhow!(error));
            }
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_partial(partial: PartialListing) -> anyhow::Error {
    print!("{}", partial.listing);
    anyhow!(partial.error)
}

fn load_table_file(path: &Path) -> Result<TableFile> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match TableFile::parse_source(&source) {
        Ok(file) => {
            log::debug!("loaded table file {}", path.display());
            Ok(file)
        }
        Err(TableError::Parse(errors)) => {
            for error in errors.iter() {
                eprintln!(
                    "{}:{}: {}",
                    path.display(),
                    error.span.line_in(&source),
                    error.message
                );
                for label in error.labels.iter() {
                    eprintln!(
                        "{}:{}:   {}",
                        path.display(),
                        label.span.line_in(&source),
                        label.message
                    );
                }
            }
            bail!("{} errors in table file {}", errors.len(), path.display());
        }
        Err(error) => Err(error.into()),
    }
}

//===========================================================================//
