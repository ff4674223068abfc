#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use yangl::loader::FsSchemaSource;
use yangl::schema::Context;
use yangl_support::{Level, SchemaSource};

#[derive(Parser)]
#[command(name = "yangl", about = "YANG schema compilation and instance-data validation")]
struct Cli {
  /// Directory to search for imported/included modules.
  #[arg(short, long, global = true)]
  search_dir: Option<PathBuf>,

  /// Increase log verbosity (repeatable).
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a module's raw text from the search path and print it.
  Load { name: String, revision: Option<String> },
  /// Load the built-in module set and report what's implemented.
  Validate,
  /// Print the `ietf-yang-library` modules-state tree.
  Info,
}

fn verbosity_from_count(count: u8) -> Level {
  match count {
    0 => Level::Error,
    1 => Level::Warning,
    2 => Level::Verbose,
    _ => Level::Debug,
  }
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let mut ctx = Context::new(cli.search_dir.as_deref())?;
  ctx.set_verbosity(verbosity_from_count(cli.verbose));

  match cli.command {
    Commands::Load { name, revision } => {
      let source = FsSchemaSource::new(ctx.search_dirs().to_vec());
      let (text, format) = source.load(&name, revision.as_deref())?;
      println!("# {name} ({format})\n{text}");
    }
    Commands::Validate => {
      println!("loaded {} built-in module(s):", ctx.modules().count());
      for (_, module) in ctx.modules() {
        println!("  {} (implemented: {})", module.name, module.implemented);
      }
    }
    Commands::Info => {
      let tree = ctx.info()?;
      for &root in tree.roots() {
        print_data_node(&tree, root, 0);
      }
    }
  }

  Ok(())
}

fn print_data_node(tree: &yangl::data::DataTree, id: yangl::data::DataNodeId, depth: usize) {
  let node = tree.node(id);
  let indent = "  ".repeat(depth);
  match &node.value_str {
    Some(value) => println!("{indent}{}: {value}", node.name),
    None => println!("{indent}{}", node.name),
  }
  for &child in &node.children {
    print_data_node(tree, child, depth + 1);
  }
}
