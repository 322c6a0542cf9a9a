use crate::cli::SchemaArgs;
use crate::config::Config;
use crate::parser::Analysis;
use schemars::schema_for;
use std::collections::BTreeMap;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = if args.response {
        // Personality key -> analysis
        schema_for!(BTreeMap<String, Analysis>)
    } else {
        schema_for!(Config)
    };
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{}", json);
    Ok(())
}
