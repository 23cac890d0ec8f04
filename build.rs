//! Compiles `config/contractions.toml` into a static lookup table.

use std::env;
use std::fs;
use std::path::Path;

const TABLE_PATH: &str = "config/contractions.toml";

fn main() {
    println!("cargo:rerun-if-changed={TABLE_PATH}");

    let raw = fs::read_to_string(TABLE_PATH)
        .unwrap_or_else(|err| panic!("failed to read {TABLE_PATH}: {err}"));
    let table: toml::Table = raw
        .parse()
        .unwrap_or_else(|err| panic!("failed to parse {TABLE_PATH}: {err}"));

    let mut entries: Vec<(String, String)> = Vec::new();
    for (section, value) in &table {
        let Some(pairs) = value.as_table() else {
            panic!("{TABLE_PATH}: section `{section}` must be a table");
        };
        for (key, expansion) in pairs {
            let Some(expansion) = expansion.as_str() else {
                panic!("{TABLE_PATH}: `{section}.{key}` must be a string");
            };
            let key = key.to_lowercase();
            if entries.iter().any(|(existing, _)| *existing == key) {
                panic!("{TABLE_PATH}: duplicate contraction `{key}`");
            }
            entries.push((key, expansion.to_string()));
        }
    }
    entries.sort();

    let mut generated = String::from("pub(crate) static CONTRACTIONS: &[(&str, &str)] = &[\n");
    for (key, expansion) in &entries {
        generated.push_str(&format!("    ({key:?}, {expansion:?}),\n"));
    }
    generated.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("contractions.rs"), generated)
        .expect("failed to write generated contractions table");
}
