// cli-bin/build.rs
//
// Renders the CLI cheatsheet at compile time: `src/cli/commands.yaml`
// becomes a Markdown table in `cli-bin/docs/cli_cheatsheet.md`.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

#[derive(Deserialize)]
struct Group {
    alias: Option<String>,
    #[serde(default)]
    actions: BTreeMap<String, Action>,
}

#[derive(Deserialize)]
struct Action {
    alias: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    about: String,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli/commands.yaml");

    if let Err(e) = generate_cheatsheet() {
        eprintln!("Failed to generate CLI cheatsheet: {e}");
        std::process::exit(1);
    }
}

fn with_alias(name: &str, alias: Option<&String>) -> String {
    match alias {
        Some(a) => format!("{name}/{a}"),
        None => name.to_string(),
    }
}

fn generate_cheatsheet() -> Result<(), Box<dyn std::error::Error>> {
    let yaml_str = fs::read_to_string("src/cli/commands.yaml")?;
    let groups: BTreeMap<String, Group> = serde_yaml::from_str(&yaml_str)?;

    let mut table = String::from(
        "| Command | Flags | Description |\n| ------- | ----- | ----------- |\n",
    );

    for (group_name, group) in &groups {
        let group_disp = with_alias(group_name, group.alias.as_ref());
        for (action_name, action) in &group.actions {
            let mut cmd = format!(
                "docket {} {}",
                group_disp,
                with_alias(action_name, action.alias.as_ref())
            );
            for arg in &action.args {
                cmd.push(' ');
                cmd.push_str(arg);
            }
            let flags = if action.flags.is_empty() {
                "-".to_string()
            } else {
                action.flags.join(", ")
            };
            table.push_str(&format!("| `{}` | {} | {} |\n", cmd, flags, action.about));
        }
    }

    fs::create_dir_all(Path::new("docs"))?;
    fs::write("docs/cli_cheatsheet.md", table)?;

    Ok(())
}
