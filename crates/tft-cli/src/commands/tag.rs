use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct TagArgs {
    /// Create an annotated tag object
    #[arg(short = 'a')]
    annotate: bool,

    /// Tag message (implies -a)
    #[arg(short = 'm', value_name = "msg")]
    message: Option<String>,

    /// Tag name; lists tags when omitted
    #[arg(value_name = "tagname")]
    name: Option<String>,

    /// Object to tag
    #[arg(value_name = "object", default_value = "HEAD")]
    object: String,
}

pub fn run(args: &TagArgs) -> Result<i32> {
    let repo = open_repo()?;

    let Some(name) = &args.name else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for reference in repo.refs().iter(Some("refs/tags/"))? {
            writeln!(out, "{}", reference.name().short_name())?;
        }
        return Ok(0);
    };

    if args.annotate && args.message.is_none() {
        bail!("annotated tag '{name}' needs a message (-m)");
    }
    repo.create_tag(name, &args.object, args.message.as_deref())?;
    Ok(0)
}
