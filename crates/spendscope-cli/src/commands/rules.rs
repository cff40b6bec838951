//! Rule registry listing

use anyhow::Result;

use spendscope_core::InsightEngine;

pub fn cmd_rules() -> Result<()> {
    print!("{}", render_rules(&InsightEngine::new()));
    Ok(())
}

pub fn render_rules(engine: &InsightEngine) -> String {
    let mut out = format!("📚 {} rule(s), in execution order\n", engine.len());
    for (position, (insight_type, name)) in engine
        .insight_types()
        .into_iter()
        .zip(engine.rule_names())
        .enumerate()
    {
        out.push_str(&format!(
            "   {}. {} [{}] ({})\n",
            position + 1,
            name,
            insight_type.label(),
            insight_type.as_str()
        ));
    }
    out
}
