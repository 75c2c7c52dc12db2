use colored::Colorize;
use serde::Serialize;

use blogsift::config::Config;
use blogsift::error::Result;
use blogsift::page_facts::BlogMetadata;
use blogsift::scoring::{self, BlogSignal};
use blogsift::Extractor;

use super::load_pages;

/// Per-page scoring report for `blogsift score --json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageReport {
    url: String,
    blog_score: f32,
    candidate: bool,
    signals: Vec<SignalReport>,
    indicator_score: f32,
    metadata: BlogMetadata,
}

#[derive(Debug, Serialize)]
struct SignalReport {
    signal: BlogSignal,
    weight: f32,
}

/// Score every page and print which signals fired
pub fn cmd_score(input: &str, json: bool) -> Result<()> {
    let pages = load_pages(input)?;
    let extractor = Extractor::new(Config::load()?);

    let reports: Vec<PageReport> = extractor
        .score(&pages)
        .into_iter()
        .map(|scored| PageReport {
            candidate: extractor.is_candidate(&scored),
            signals: scoring::explain(&scored.facts)
                .into_iter()
                .map(|(signal, weight)| SignalReport { signal, weight })
                .collect(),
            indicator_score: scored.metadata().blog_indicator_score(),
            metadata: scored.metadata().clone(),
            url: scored.page.url,
            blog_score: scored.blog_score,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!();
    for report in &reports {
        let score = format!("{:>5.2}", report.blog_score);
        let score = if report.candidate {
            score.green().bold()
        } else {
            score.dimmed()
        };
        println!("{}  {}", score, report.url);
        for signal in &report.signals {
            println!("         +{:.1} {}", signal.weight, signal.signal);
        }
        if report.indicator_score > 0.0 {
            println!("         +{:.1} metadata indicators", report.indicator_score * scoring::INDICATOR_WEIGHT);
        }
    }

    let candidates = reports.iter().filter(|r| r.candidate).count();
    println!(
        "\n{} of {} page(s) at or above {:.1}",
        candidates,
        reports.len(),
        extractor.config().score_threshold
    );
    Ok(())
}
