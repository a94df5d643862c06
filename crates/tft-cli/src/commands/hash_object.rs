use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Args;
use tft_hash::hasher::Hasher;
use tft_object::{Object, ObjectKind};

use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object type
    #[arg(short = 't', value_name = "type", default_value = "blob")]
    obj_type: ObjectKind,

    /// Write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Read the object from stdin
    #[arg(long, conflicts_with = "file")]
    stdin: bool,

    /// File to hash
    #[arg(value_name = "file", required_unless_present = "stdin")]
    file: Option<String>,
}

pub fn run(args: &HashObjectArgs) -> Result<i32> {
    let data = match &args.file {
        Some(file) => std::fs::read(file).with_context(|| format!("cannot read '{file}'"))?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
    };

    // Only well-formed payloads get an id.
    Object::parse(args.obj_type, &data)
        .with_context(|| format!("content is not a valid {}", args.obj_type))?;

    let oid = if args.write {
        open_repo()?.objects().write_raw(args.obj_type, &data)?
    } else {
        Hasher::hash_object(args.obj_type.as_str(), &data)?
    };

    writeln!(io::stdout().lock(), "{oid}")?;
    Ok(0)
}
