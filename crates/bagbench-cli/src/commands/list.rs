use anyhow::Result;
use bagbench::SuiteConfig;
use console::style;

fn render_list(suite: &SuiteConfig) -> Vec<String> {
    let width = suite
        .benchmarks
        .iter()
        .map(|b| b.name.len())
        .max()
        .unwrap_or(0)
        .max("benchmark".len());

    let mut lines = vec![format!(
        "{:<width$}  {}",
        "benchmark",
        "entry point / parameters / repetitions / sweep",
        width = width
    )];
    for bench in &suite.benchmarks {
        let sweep: Vec<String> = suite
            .sweep_for(bench)
            .iter()
            .map(|x| x.to_string())
            .collect();
        let disabled = if bench.enabled { "" } else { " (disabled)" };
        lines.push(format!(
            "{:<width$}  {}::{} {:?} x{} [{}]{}",
            bench.name,
            bench.library,
            bench.symbol,
            bench.parameters,
            suite.repetitions_for(bench),
            sweep.join(", "),
            disabled,
            width = width
        ));
    }
    lines
}

pub fn handle_list(suite: &SuiteConfig) -> Result<()> {
    let lines = render_list(suite);
    if let Some((header, rows)) = lines.split_first() {
        println!("{}", style(header).bold());
        for row in rows {
            println!("{}", row);
        }
    }
    for lib in &suite.libraries {
        println!(
            "{} {} => {}",
            style("library").dim(),
            lib.name,
            lib.path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_default_suite() {
        let suite = SuiteConfig::default();
        let lines = render_list(&suite);
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("benchrand_10000 "));
        assert!(lines[1].contains("bags::benchmark_random [100000] x20 [1, 2, 4, 6, 8]"));
        assert!(lines[2].contains("queue::benchmark_random"));
    }

    #[test]
    fn test_disabled_benchmarks_are_marked() {
        let mut suite = SuiteConfig::default();
        suite.benchmarks[0].enabled = false;
        let lines = render_list(&suite);
        assert!(lines[1].ends_with("(disabled)"));
    }
}
