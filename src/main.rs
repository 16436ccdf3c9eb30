use anyhow::{Context, Result};
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use search_query::{SearchDefinition, SqlCompiler};

const DEFAULT_DEFINITION: &str = "search_definition.json";
const DEFAULT_TABLE: &str = "items";

/// Loads the search definition, falling back to the demo one.
fn load_definition(path: &str) -> SearchDefinition {
    match SearchDefinition::from_json_file(path) {
        Ok(definition) => {
            info!("loaded search definition from {}", path);
            definition
        }
        Err(e) => {
            warn!("{}; using the demo definition", e);
            SearchDefinition::demo()
        }
    }
}

fn print_fields(definition: &SearchDefinition) {
    let mut fields: Vec<_> = definition.fields().get_mappings().iter().collect();
    fields.sort();
    for (alias, field) in fields {
        println!("  {} -> {}", alias, field);
    }
}

fn run_query(definition: &SearchDefinition, compiler: &SqlCompiler, raw: &str) {
    match definition.parse(raw) {
        Ok(tree) => {
            println!("tree: {}", tree);
            match compiler.compile_select(&tree) {
                Ok(sql) => println!("sql:  {}", sql),
                Err(e) => println!("compile failed: {}", e),
            }
        }
        Err(e) => println!("rejected: {}", e),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_DEFINITION.to_string());
    let table = args.next().unwrap_or_else(|| DEFAULT_TABLE.to_string());

    let definition = load_definition(&path);
    let compiler = SqlCompiler::new(table);

    println!("--- search_query: query string to predicate tree ---");
    println!(
        "param `{}`, default operator {}, unmapped fields: {:?}",
        definition.param(),
        definition.default_operator(),
        definition.unmapped()
    );
    print_fields(&definition);
    println!("type a query such as `name__co__Py+age__lt__18`, `:fields`, or `:quit`");

    let mut editor = DefaultEditor::new().context("cannot start line editor")?;
    loop {
        match editor.readline("search> ") {
            Ok(line) => {
                let line = line.trim();
                editor
                    .add_history_entry(line)
                    .context("cannot record history")?;
                match line {
                    ":quit" | ":q" => break,
                    ":fields" => print_fields(&definition),
                    raw => run_query(&definition, &compiler, raw),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("cannot read input"),
        }
    }

    Ok(())
}
