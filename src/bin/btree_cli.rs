//! Simple CLI for exercising the B-tree.
//!
//! Replays a script of commands against a fresh tree of integers:
//!   btree_cli <min_degree> add <item>... remove <item>... contains <item>
//!             list len stats dump json check
//!
//! Example:
//!   btree_cli 2 add 10 20 30 40 remove 20 dump list

use btree_multiset::{BTree, BTreeError};
use std::env;
use std::process::exit;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn usage() -> ! {
    eprintln!("Usage: btree_cli <min_degree> <command> [args...] [<command> [args...]]...");
    eprintln!("Commands:");
    eprintln!("  add <item>...       - Insert one or more integers");
    eprintln!("  remove <item>...    - Remove one occurrence of each integer");
    eprintln!("  contains <item>     - Check whether an integer is present");
    eprintln!("  list                - Print all items in ascending order");
    eprintln!("  len                 - Print the number of items");
    eprintln!("  stats               - Show tree statistics");
    eprintln!("  dump                - Print the tree as indented text");
    eprintln!("  json                - Print the tree structure as JSON");
    eprintln!("  check               - Verify the structural invariants");
    exit(1);
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}", err);
    exit(1);
}

fn parse_degree(arg: &str) -> Result<usize, BTreeError> {
    arg.parse().map_err(|_| {
        BTreeError::config(format!("minimum degree '{}' is not a number", arg))
    })
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btree_multiset=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        usage();
    }

    let mut tree = match parse_degree(&args[0]).and_then(BTree::<i64>::new) {
        Ok(tree) => tree,
        Err(e) => fail(e),
    };
    tracing::debug!(min_degree = tree.min_degree(), "tree ready");

    let mut tokens = args[1..].iter().peekable();
    while let Some(command) = tokens.next() {
        match command.as_str() {
            "add" | "remove" => {
                let mut items = Vec::new();
                while let Some(item) = tokens.peek().and_then(|t| t.parse::<i64>().ok()) {
                    items.push(item);
                    tokens.next();
                }
                if items.is_empty() {
                    fail(format!("'{}' needs at least one integer", command));
                }

                for item in items {
                    if command == "add" {
                        tree.insert(item);
                        println!("ADDED {}", item);
                    } else if tree.remove(&item) {
                        println!("REMOVED {}", item);
                    } else {
                        println!("NOT_FOUND {}", item);
                    }
                }
            }

            "contains" => {
                let item = match tokens.next().map(|t| t.parse::<i64>()) {
                    Some(Ok(item)) => item,
                    _ => fail("'contains' needs an integer"),
                };
                println!("{}", if tree.contains(&item) { "FOUND" } else { "NOT_FOUND" });
            }

            "list" => {
                let items: Vec<String> = tree.iter().map(ToString::to_string).collect();
                println!("[{}]", items.join(", "));
            }

            "len" => println!("{}", tree.len()),

            "stats" => {
                let stats = tree.stats();
                println!("len: {}", stats.len);
                println!("height: {}", stats.height);
                println!("node_count: {}", stats.node_count);
                println!("min_degree: {}", stats.min_degree);
            }

            "dump" => print!("{}", tree.dump()),

            "json" => match tree.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => fail(e),
            },

            "check" => match tree.validate() {
                Ok(()) => println!("OK"),
                Err(e) => fail(e),
            },

            _ => {
                eprintln!("Unknown command: {}", command);
                usage();
            }
        }
    }
}
