use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use tft_object::ObjectKind;

use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected type; tags and commits are followed to reach it
    #[arg(value_name = "type")]
    obj_type: ObjectKind,

    /// The object to show
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = repo.resolve_to(&args.object, args.obj_type)?;
    let (_, payload) = repo.objects().read_raw(&oid)?;
    io::stdout().lock().write_all(&payload)?;
    Ok(0)
}
