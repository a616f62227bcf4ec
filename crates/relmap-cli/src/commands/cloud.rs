//! `relmap cloud`: report the detected hosting platform.

use super::GlobalArgs;
use anyhow::Result;
use relmap_core::{CloudProvider, CloudSettings, ProcessEnv};

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let settings = CloudProvider::detect(&ProcessEnv).settings();

    if global.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("{}", render(&settings));
    }
    Ok(())
}

fn render(settings: &CloudSettings) -> String {
    let mut lines = vec![
        format!("Provider: {}", settings.provider),
        format!("Tested: {}", if settings.tested { "yes" } else { "no" }),
    ];
    if let Some(warning) = settings.warning {
        lines.push(format!("Warning: {}", warning));
    }
    if !settings.recommendations.is_empty() {
        lines.push("Recommendations:".to_string());
        for recommendation in &settings.recommendations {
            lines.push(format!("  - {}", recommendation));
        }
    }
    lines.join("\n")
}
