use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "canvas-group", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a scene, run every group's initial layout and print the resulting JSON.
    Layout(LayoutArgs),
    /// Print the SVG markup of every root object.
    Svg(SvgArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Wrap the markup in an `<svg>` document element.
    #[arg(long)]
    document: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Svg(args) => cmd_svg(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<(canvas_group::Scene, Vec<canvas_group::NodeId>)> {
    let doc = canvas_group::SceneDocument::from_path(path)?;
    let mut scene = canvas_group::Scene::new();
    let ids = scene
        .load_document(&doc)
        .with_context(|| format!("build scene from '{}'", path.display()))?;
    Ok((scene, ids))
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let (scene, _) = load_scene(&args.in_path)?;
    let json = scene.to_document()?.to_json_pretty()?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}").context("write scene JSON")?;
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let (scene, ids) = load_scene(&args.in_path)?;
    let mut markup = String::new();
    for id in ids {
        markup.push_str(&scene.to_svg(id)?);
    }

    let mut out = std::io::stdout().lock();
    if args.document {
        writeln!(out, "<svg xmlns=\"http://www.w3.org/2000/svg\">").context("write svg")?;
        for line in markup.lines() {
            writeln!(out, "  {line}").context("write svg")?;
        }
        writeln!(out, "</svg>").context("write svg")?;
    } else {
        write!(out, "{markup}").context("write svg")?;
    }
    Ok(())
}
