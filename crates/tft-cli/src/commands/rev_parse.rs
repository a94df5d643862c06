use anyhow::{bail, Result};
use clap::Args;
use tft_object::ObjectKind;

use super::open_repo;

#[derive(Args)]
pub struct RevParseArgs {
    /// Peel the result to an object of this type
    #[arg(long = "type", value_name = "type")]
    obj_type: Option<ObjectKind>,

    /// Name to resolve: HEAD, a branch, a tag or a (short) object id
    #[arg(value_name = "name")]
    name: String,
}

pub fn run(args: &RevParseArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = match args.obj_type {
        Some(kind) => repo.resolve_to(&args.name, kind)?,
        None => match repo.resolve_object(&args.name, None, true)? {
            Some(oid) => oid,
            None => bail!("ambiguous argument '{}': unknown revision", args.name),
        },
    };
    println!("{oid}");
    Ok(0)
}
