use std::{env, fs};

use mccq_tree::{build_v1, TreeShape};

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: mccq_build_v1 <commands.json>");
        std::process::exit(2);
    };
    if args.next().is_some() {
        eprintln!("usage: mccq_build_v1 <commands.json>");
        std::process::exit(2);
    }

    let text = match fs::read_to_string(&path) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            std::process::exit(2);
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("`{path}` is not valid JSON: {err}");
            std::process::exit(2);
        }
    };

    match build_v1(&value) {
        Ok(root) => {
            println!(
                "ok(v1): base_commands={} population={} leaves={} depth={}",
                root.children.len(),
                root.population,
                root.leaves().count(),
                root.depth()
            );
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
