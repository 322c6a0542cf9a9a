use crate::cli::PersonalitiesArgs;
use serde_json::json;

pub fn execute(args: PersonalitiesArgs) -> anyhow::Result<()> {
    let config = args.config.load()?;
    let registry = config.registry()?;

    if args.json {
        let entries: Vec<_> = registry
            .iter()
            .map(|p| json!({ "key": p.key, "name": p.name, "instruction": p.instruction }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let width = registry.keys().map(str::len).max().unwrap_or(0);
    for personality in registry.iter() {
        println!("{:<width$}  {}", personality.key, personality.name, width = width);
    }

    Ok(())
}
