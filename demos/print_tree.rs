//! Inserts a run of integers into a tree and prints it breadth first.
//!
//! Rotations are logged at `trace` level: `RUST_LOG=trace cargo run --example print_tree`.

use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use avl_insert::AvlTree;

#[derive(Parser, Debug)]
#[command(about = "Insert integers into an AVL tree and print it")]
struct Cli {
    /// Insert 0, 1, ..., COUNT - 1 in ascending order.
    #[arg(long, default_value_t = 21)]
    count: i64,

    /// Insert these values, in order, instead of an ascending run.
    #[arg(long, value_delimiter = ',', conflicts_with = "count")]
    values: Vec<i64>,

    /// Also print the tree row by row, centred, keeping gaps for absent nodes.
    #[arg(long)]
    graphical: bool,
}

fn main() {
    // If the log level is not set, set it to "info"
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let values = if cli.values.is_empty() {
        (0..cli.count).collect()
    } else {
        cli.values
    };

    let mut tree = AvlTree::new();
    for value in &values {
        if !tree.insert(*value) {
            info!("{} already present, skipped", value);
        }
    }
    info!(
        "inserted {} values, {} distinct, height {}",
        values.len(),
        tree.len(),
        tree.height()
    );

    print!("{{ ");
    for node in tree.level_order() {
        print!("{} ", node.value());
    }
    println!("}}");

    if cli.graphical {
        print_graphical(&tree);
    }
}

fn print_graphical(tree: &AvlTree<i64>) {
    let levels = tree.levels();
    let cell = tree.iter().map(|value| value.to_string().len()).max().unwrap_or(0) + 2;
    let width = cell << levels.len().saturating_sub(1);
    for row in &levels {
        let slot_width = width / row.len();
        let line: String = row
            .iter()
            .map(|slot| {
                let text = slot.map(ToString::to_string).unwrap_or_default();
                format!("{:^1$}", text, slot_width)
            })
            .collect();
        println!("{}", line.trim_end());
    }
}
