use std::path::Path;

use anyhow::Result;
use introscore_core::rubric::Rubric;
use introscore_core::tiers::all_tables;

use super::score::resolve_rubric;

pub fn run(start: &Path, explicit: Option<&Path>, format: &str) -> Result<()> {
    let rubric = resolve_rubric(start, explicit)?;
    match format {
        "toml" => print!("{}", rubric.to_toml_string()?),
        "table" => print!("{}", render_table(&rubric)),
        other => anyhow::bail!("unknown format: {other} (expected table or toml)"),
    }
    Ok(())
}

pub fn render_table(rubric: &Rubric) -> String {
    let widths = (14usize, 14usize);
    let mut out = String::new();

    out.push_str(&format!(
        "{:<tier$}  {:<topic$}  Phrases\n",
        "Tier",
        "Topic",
        tier = widths.0,
        topic = widths.1,
    ));
    out.push_str(&format!(
        "{}\u{2500}{}\u{2500}{}\n",
        "\u{2500}".repeat(widths.0 + 1),
        "\u{2500}".repeat(widths.1 + 1),
        "\u{2500}".repeat(40),
    ));
    for (tier, topic) in rubric.keywords.iter() {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {}\n",
            format!("{tier} ({})", tier.weight()),
            topic.name,
            topic.phrases.join(", "),
            w0 = widths.0,
            w1 = widths.1,
        ));
    }

    out.push_str("\nSalutations\n");
    for (level, phrases) in rubric.salutations.in_priority_order() {
        out.push_str(&format!("  {:<10} ({})  {}\n", level.to_string(), level.score(), phrases.join(", ")));
    }

    out.push_str(&format!("\nClosings: {}\n", rubric.closings.join(", ")));
    out.push_str(&format!("Fillers:  {}\n", rubric.fillers.join(", ")));
    out.push_str(&format!("Ignored grammar rules: {}\n", rubric.ignored_grammar_rules.join(", ")));

    out.push_str("\nScore tiers\n");
    for table in all_tables() {
        out.push_str(&format!("  {} (max {})\n", table.name, table.max));
        for tier in table.tiers {
            out.push_str(&format!("    {:<16} {:>2}\n", tier.to_string(), tier.score));
        }
    }

    out
}
