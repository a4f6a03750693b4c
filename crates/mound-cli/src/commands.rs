use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use mound_store::{Descriptor, Mound, MoundConfig, MoundStore};
use mound_types::{parse_semver, semver, BlobRef, Did, SEMVER_PREFIX};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = MoundStore::new(load_config(&cli)?);
    tracing::debug!(root = %store.root().display(), durable = store.is_durable(), "store ready");
    let format = cli.format;

    match cli.command {
        Command::Create(args) => cmd_create(&store, args, &format),
        Command::Blob(args) => cmd_blob(&store, args, &format),
        Command::Write(args) => cmd_write(&store, args),
        Command::Link(args) => cmd_link(&store, args, &format),
        Command::Close(args) => cmd_close(&store, args, &format),
        Command::Show(args) => cmd_show(&store, args, &format),
        Command::Cat(args) => cmd_cat(&store, args),
        Command::Path(args) => cmd_path(&store, args),
        Command::Demo(args) => cmd_demo(&store, args, &format),
    }
}

/// Defaults, then `--config`, then environment, then flags.
fn load_config(cli: &Cli) -> anyhow::Result<MoundConfig> {
    let config = match &cli.config {
        Some(path) => MoundConfig::load(path)?,
        None => MoundConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if cli.durable {
        config.durable = true;
    }
    Ok(config)
}

fn open(store: &MoundStore, did: &str) -> anyhow::Result<Mound> {
    let did = Did::parse(did).with_context(|| format!("bad identifier {did:?}"))?;
    Ok(store.open(&did)?)
}

fn cmd_create(store: &MoundStore, args: CreateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let version = match (args.version, args.semver) {
        (Some(version), _) => version,
        (None, Some(triple)) => semver_from_triple(&triple)?,
        (None, None) => semver(0, 0, 0),
    };
    let mound = store.create(&args.program, &version)?;
    match format {
        OutputFormat::Json => print_json(mound.descriptor())?,
        OutputFormat::Text => println!("{}", mound.did()),
    }
    Ok(())
}

fn cmd_blob(store: &MoundStore, args: BlobArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut mound = open(store, &args.did)?;
    let names: Vec<&str> = args.names.iter().map(String::as_str).collect();
    let blob = mound.allocate_blob(&names)?;
    match format {
        OutputFormat::Json => print_json(mound.descriptor())?,
        OutputFormat::Text => println!("{}", blob.slot()),
    }
    Ok(())
}

fn cmd_write(store: &MoundStore, args: WriteArgs) -> anyhow::Result<()> {
    let mound = open(store, &args.did)?;
    let blob = mound.blob_handle(args.slot)?;
    let data = match args.text {
        Some(text) => text.into_bytes(),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };
    if args.line {
        blob.write_line(&data)?;
    } else {
        blob.write(&data)?;
    }
    Ok(())
}

fn cmd_link(store: &MoundStore, args: LinkArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut mound = open(store, &args.did)?;
    let added = mound.link(&args.target)?;
    match format {
        OutputFormat::Json => print_json(mound.descriptor())?,
        OutputFormat::Text if added => println!("{} Linked {}", "✓".green(), args.target.cyan()),
        OutputFormat::Text => println!("Already linked to {}", args.target.cyan()),
    }
    Ok(())
}

fn cmd_close(store: &MoundStore, args: CloseArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut mound = open(store, &args.did)?;
    mound.close(args.status)?;
    match format {
        OutputFormat::Json => print_json(mound.descriptor())?,
        OutputFormat::Text => println!(
            "{} Closed {} with status {}",
            "✓".green().bold(),
            mound.did().to_string().cyan(),
            status_label(args.status)
        ),
    }
    Ok(())
}

fn cmd_show(store: &MoundStore, args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mound = open(store, &args.did)?;
    match format {
        OutputFormat::Json => print_json(mound.descriptor()),
        OutputFormat::Text => {
            print_descriptor(mound.descriptor());
            Ok(())
        }
    }
}

fn cmd_cat(store: &MoundStore, args: CatArgs) -> anyhow::Result<()> {
    let mound = open(store, &args.did)?;
    let slot = match args.blob.parse::<usize>() {
        Ok(slot) => slot,
        Err(_) => match mound.blob_slot(&args.blob) {
            Some(slot) => slot,
            None => bail!("no blob named {:?} on {}", args.blob, mound.did()),
        },
    };
    let data = mound.blob_handle(slot)?.read()?;
    io::stdout().write_all(&data).context("writing stdout")?;
    Ok(())
}

fn cmd_path(store: &MoundStore, args: PathArgs) -> anyhow::Result<()> {
    let path = store.layout().resolve(&args.did, args.slot)?;
    println!("{}", path.display());
    Ok(())
}

/// Create an entity, write two blobs, close it, print the result.
fn cmd_demo(store: &MoundStore, args: DemoArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut mound = store.create(&args.program, &semver(1, 0, 0))?;

    let b0 = mound.blob()?;
    b0.write_line("Hello, Rust!")?;
    b0.write_line("Hello, Rust!")?;

    let b1 = mound.named_blob("test")?;
    b1.write_line("This is a test")?;

    mound.close(0)?;

    match format {
        OutputFormat::Json => print_json(mound.descriptor())?,
        OutputFormat::Text => {
            print_descriptor(mound.descriptor());
            println!("  Dir: {}", mound.dir()?.display().to_string().dimmed());
        }
    }
    Ok(())
}

fn semver_from_triple(triple: &str) -> anyhow::Result<String> {
    let (major, minor, patch) = parse_semver(&format!("{SEMVER_PREFIX}{triple}"))
        .with_context(|| format!("expected MAJOR.MINOR.PATCH, got {triple:?}"))?;
    Ok(semver(major, minor, patch))
}

fn print_json(doc: &Descriptor) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(doc)?);
    Ok(())
}

fn print_descriptor(doc: &Descriptor) {
    println!("Entity {}", doc.did.to_string().cyan().bold());
    println!("  Program: {}", doc.program);
    println!("  Version: {}", doc.version.yellow());
    println!("  Status:  {}", status_label(doc.status));
    if doc.blobs.is_empty() {
        println!("  Blobs:   {}", "none".dimmed());
    } else {
        println!("  Blobs:");
        for entry in &doc.blobs {
            match entry {
                BlobRef::Indexed(slot) => println!("    {}", format!("#{slot}").yellow()),
                BlobRef::Named { name, slot } => {
                    println!("    {} {}", format!("#{slot}").yellow(), name)
                }
            }
        }
    }
    if doc.links.is_empty() {
        println!("  Links:   {}", "none".dimmed());
    } else {
        println!("  Links:");
        for link in &doc.links {
            println!("    {}", link.to_string().blue());
        }
    }
}

fn status_label(status: i32) -> colored::ColoredString {
    match status {
        -1 => "open".yellow(),
        0 => "0 (ok)".green(),
        code => code.to_string().red(),
    }
}
